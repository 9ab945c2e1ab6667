use std::fmt;

use serde::Serialize;

use dedupe_model::DetectionMethod;

/// How urgently a flagged record needs attention.
///
/// Variants are declared from most to least severe, so sorting ascending puts
/// conflicts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Conflicting,
    ExactDuplicate,
    PartialMatch,
}

impl Severity {
    /// Severity of a record flagged by `methods`, or `None` when unflagged.
    pub fn for_methods(methods: &[DetectionMethod]) -> Option<Self> {
        if methods.contains(&DetectionMethod::KeyConflict) {
            Some(Severity::Conflicting)
        } else if methods.contains(&DetectionMethod::Exact) {
            Some(Severity::ExactDuplicate)
        } else if methods.is_empty() {
            None
        } else {
            Some(Severity::PartialMatch)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Conflicting => "conflicting",
            Severity::ExactDuplicate => "exact_duplicate",
            Severity::PartialMatch => "partial_match",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_outranks_exact() {
        let methods = [DetectionMethod::Exact, DetectionMethod::KeyConflict];
        assert_eq!(Severity::for_methods(&methods), Some(Severity::Conflicting));
        assert_eq!(
            Severity::for_methods(&[DetectionMethod::Exact, DetectionMethod::CaseInsensitive]),
            Some(Severity::ExactDuplicate)
        );
        assert_eq!(
            Severity::for_methods(&[DetectionMethod::EmailNormalized]),
            Some(Severity::PartialMatch)
        );
        assert_eq!(Severity::for_methods(&[]), None);
        assert!(Severity::Conflicting < Severity::PartialMatch);
    }
}
