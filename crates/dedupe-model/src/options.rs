//! Configuration options for a deduplication run.

use serde::{Deserialize, Serialize};

use crate::detection::DetectionMethod;
use crate::error::{DedupeError, Result};
use crate::resolution::MergeStrategy;

/// How nulls take part in key comparison.
///
/// Accepted in configuration but not consulted by any comparison: nulls are
/// always compared as a value of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullHandling {
    #[default]
    IgnoreNulls,
    MatchNulls,
}

/// Whether members of a key conflict may be removed or merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Conflicting groups are left untouched and reported for review.
    #[default]
    Exclude,
    /// Conflicting groups are resolved like any other duplicate group.
    Include,
}

/// Weights and thresholds for the impact score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringOptions {
    pub dedup_reduction_weight: f64,
    pub data_retention_weight: f64,
    pub column_retention_weight: f64,
    /// Minimum overall score labelled `excellent`.
    pub excellent_threshold: f64,
    /// Minimum overall score labelled `good`.
    pub good_threshold: f64,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            dedup_reduction_weight: 0.5,
            data_retention_weight: 0.3,
            column_retention_weight: 0.2,
            excellent_threshold: 85.0,
            good_threshold: 70.0,
        }
    }
}

impl ScoringOptions {
    pub fn weights(&self) -> [f64; 3] {
        [
            self.dedup_reduction_weight,
            self.data_retention_weight,
            self.column_retention_weight,
        ]
    }
}

/// Options controlling detection, resolution and scoring.
///
/// Built once per invocation and passed by reference to every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupeOptions {
    /// Methods to run, in report order.
    pub detection_types: Vec<DetectionMethod>,

    pub merge_strategy: MergeStrategy,

    /// Columns forming the normalized key. Empty means whole-row comparison.
    pub key_columns: Vec<String>,

    /// Email columns. Empty triggers automatic classification.
    pub email_columns: Vec<String>,

    pub null_handling: NullHandling,

    /// Free-form note carried into the report; not interpreted.
    pub conflict_resolution: Option<String>,

    pub conflict_policy: ConflictPolicy,

    pub scoring: ScoringOptions,
}

impl Default for DedupeOptions {
    fn default() -> Self {
        Self {
            detection_types: DetectionMethod::ALL.to_vec(),
            merge_strategy: MergeStrategy::default(),
            key_columns: Vec::new(),
            email_columns: Vec::new(),
            null_handling: NullHandling::default(),
            conflict_resolution: None,
            conflict_policy: ConflictPolicy::default(),
            scoring: ScoringOptions::default(),
        }
    }
}

impl DedupeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detection_types(mut self, methods: impl IntoIterator<Item = DetectionMethod>) -> Self {
        self.detection_types = methods.into_iter().collect();
        self
    }

    pub fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }

    pub fn with_key_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.key_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_email_columns<S: Into<String>>(
        mut self,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.email_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringOptions) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn runs(&self, method: DetectionMethod) -> bool {
        self.detection_types.contains(&method)
    }

    /// Check weights and thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`DedupeError::InvalidConfig`] for a weight outside `[0, 1]`,
    /// a threshold outside `[0, 100]`, or a `good` threshold above `excellent`.
    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;
        let named = [
            ("dedup_reduction_weight", scoring.dedup_reduction_weight),
            ("data_retention_weight", scoring.data_retention_weight),
            ("column_retention_weight", scoring.column_retention_weight),
        ];
        for (name, weight) in named {
            if !(0.0..=1.0).contains(&weight) {
                return Err(DedupeError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {weight}"
                )));
            }
        }
        for (name, threshold) in [
            ("excellent_threshold", scoring.excellent_threshold),
            ("good_threshold", scoring.good_threshold),
        ] {
            if !(0.0..=100.0).contains(&threshold) {
                return Err(DedupeError::InvalidConfig(format!(
                    "{name} must be within [0, 100], got {threshold}"
                )));
            }
        }
        if scoring.good_threshold > scoring.excellent_threshold {
            return Err(DedupeError::InvalidConfig(format!(
                "good_threshold ({}) exceeds excellent_threshold ({})",
                scoring.good_threshold, scoring.excellent_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_every_method() {
        let options = DedupeOptions::default();
        assert_eq!(options.detection_types.len(), 4);
        assert_eq!(options.merge_strategy, MergeStrategy::RemoveDuplicates);
        assert_eq!(options.conflict_policy, ConflictPolicy::Exclude);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn deserializes_partial_toml() {
        let options: DedupeOptions = toml::from_str(
            r#"
            detection_types = ["exact", "conflicting"]
            merge_strategy = "merge_smart"
            key_columns = ["id"]

            [scoring]
            good_threshold = 60.0
            "#,
        )
        .expect("parse options");
        assert_eq!(
            options.detection_types,
            vec![DetectionMethod::Exact, DetectionMethod::KeyConflict]
        );
        assert_eq!(options.merge_strategy, MergeStrategy::MergeSmart);
        assert_eq!(options.key_columns, vec!["id".to_string()]);
        assert!((options.scoring.good_threshold - 60.0).abs() < f64::EPSILON);
        assert!((options.scoring.excellent_threshold - 85.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_out_of_range_weight() {
        let options = DedupeOptions::default().with_scoring(ScoringOptions {
            data_retention_weight: 1.5,
            ..ScoringOptions::default()
        });
        assert!(matches!(
            options.validate(),
            Err(DedupeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let options = DedupeOptions::default().with_scoring(ScoringOptions {
            good_threshold: 95.0,
            ..ScoringOptions::default()
        });
        assert!(options.validate().is_err());
    }
}
