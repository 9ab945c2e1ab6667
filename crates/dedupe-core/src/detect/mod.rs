//! Multi-method duplicate detection.
//!
//! Every [`DetectionMethod`] is backed by a [`DuplicateDetector`]. Detectors
//! are side-effect free and run in isolation: one failing never prevents the
//! others from reporting.
//!
//! Overlapping findings are combined by set union, so a record flagged by
//! several methods is counted once in [`DetectionReport::total_duplicates`].

mod case;
mod email;
mod exact;
mod key_conflict;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::{debug, info_span, warn};

use dedupe_model::{ConflictGroup, Dataset, DetectionMethod, Finding, Position};

use crate::columns::ColumnSelection;
use crate::error::DetectionError;
use crate::normalize::Projection;

pub use case::CaseInsensitiveDetector;
pub use email::EmailNormalizedDetector;
pub use exact::ExactDetector;
pub use key_conflict::KeyConflictDetector;

/// Inputs shared by every detector in a pass.
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    pub dataset: &'a Dataset,
    pub key_columns: &'a [String],
    /// Output of the column classifier.
    pub email_columns: &'a [String],
}

/// Non-fatal observations made while detecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectionWarning {
    /// A configured column does not exist in the dataset and was ignored.
    ReferencedColumnMissing {
        method: DetectionMethod,
        column: String,
    },
    /// Nothing was left to compare, so the method found nothing.
    EmptyComparisonSet {
        method: DetectionMethod,
        reason: String,
    },
}

impl fmt::Display for DetectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionWarning::ReferencedColumnMissing { method, column } => {
                write!(f, "{method}: column '{column}' not found in dataset, ignored")
            }
            DetectionWarning::EmptyComparisonSet { method, reason } => {
                write!(f, "{method}: skipped, {reason}")
            }
        }
    }
}

/// A detector that returned an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodFailure {
    pub method: DetectionMethod,
    pub message: String,
}

/// What one detector produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRun {
    pub finding: Finding,
    pub conflicts: Vec<ConflictGroup>,
    pub warnings: Vec<DetectionWarning>,
}

impl MethodRun {
    pub fn new(finding: Finding) -> Self {
        Self {
            finding,
            conflicts: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// An empty finding explained by a single warning.
    pub fn skipped(method: DetectionMethod, reason: impl Into<String>) -> Self {
        Self::new(Finding::empty(method)).with_warning(DetectionWarning::EmptyComparisonSet {
            method,
            reason: reason.into(),
        })
    }

    pub fn with_warning(mut self, warning: DetectionWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = DetectionWarning>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

/// A single duplicate-detection method.
pub trait DuplicateDetector: Send + Sync {
    fn method(&self) -> DetectionMethod;

    fn description(&self) -> &'static str {
        self.method().description()
    }

    /// Run the method over the context's dataset.
    ///
    /// # Errors
    ///
    /// Returns an error when the dataset cannot be compared, e.g. a record
    /// whose width does not match the schema.
    fn detect(&self, context: &DetectionContext<'_>) -> Result<MethodRun, DetectionError>;
}

/// Detectors indexed by method.
pub struct DetectorRegistry {
    detectors: BTreeMap<DetectionMethod, Box<dyn DuplicateDetector>>,
}

impl DetectorRegistry {
    pub fn empty() -> Self {
        Self {
            detectors: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, detector: Box<dyn DuplicateDetector>) {
        self.detectors.insert(detector.method(), detector);
    }

    pub fn get(&self, method: DetectionMethod) -> Option<&dyn DuplicateDetector> {
        self.detectors.get(&method).map(Box::as_ref)
    }

    pub fn methods(&self) -> impl Iterator<Item = DetectionMethod> + '_ {
        self.detectors.keys().copied()
    }

    /// Run `methods` in order and merge their results.
    ///
    /// Repeated methods run once. A method without a registered detector, or
    /// whose detector errors, becomes a [`MethodFailure`].
    pub fn run(
        &self,
        context: &DetectionContext<'_>,
        methods: &[DetectionMethod],
    ) -> DetectionReport {
        let mut report = DetectionReport::new(context.dataset.row_count());
        let mut seen = BTreeSet::new();
        for &method in methods {
            if !seen.insert(method) {
                continue;
            }
            let _span = info_span!("detect", %method).entered();
            let outcome = match self.get(method) {
                Some(detector) => detector.detect(context),
                None => Err(DetectionError::MethodExecution {
                    method,
                    message: "no detector registered".to_string(),
                }),
            };
            match outcome {
                Ok(run) => {
                    debug!(
                        affected = run.finding.count,
                        conflicts = run.conflicts.len(),
                        "method finished"
                    );
                    report.absorb(run);
                }
                Err(error) => {
                    warn!(%error, "detection method failed");
                    report.failures.push(MethodFailure {
                        method,
                        message: error.to_string(),
                    });
                }
            }
        }
        report
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(ExactDetector));
        registry.register(Box::new(CaseInsensitiveDetector));
        registry.register(Box::new(EmailNormalizedDetector));
        registry.register(Box::new(KeyConflictDetector));
        registry
    }
}

/// Shared registry with every built-in detector.
pub fn default_registry() -> &'static DetectorRegistry {
    static REGISTRY: OnceLock<DetectorRegistry> = OnceLock::new();
    REGISTRY.get_or_init(DetectorRegistry::default)
}

/// Run `methods` with the built-in detectors.
pub fn detect_duplicates(
    context: &DetectionContext<'_>,
    methods: &[DetectionMethod],
) -> DetectionReport {
    default_registry().run(context, methods)
}

/// Combined output of a detection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionReport {
    pub row_count: usize,
    /// One finding per successful method, in request order.
    pub findings: Vec<Finding>,
    pub conflicts: Vec<ConflictGroup>,
    pub warnings: Vec<DetectionWarning>,
    pub failures: Vec<MethodFailure>,
    /// Union of every finding's affected positions.
    pub affected: BTreeSet<Position>,
}

impl DetectionReport {
    pub fn new(row_count: usize) -> Self {
        Self {
            row_count,
            findings: Vec::new(),
            conflicts: Vec::new(),
            warnings: Vec::new(),
            failures: Vec::new(),
            affected: BTreeSet::new(),
        }
    }

    fn absorb(&mut self, run: MethodRun) {
        self.affected
            .extend(run.finding.affected_positions.iter().copied());
        self.findings.push(run.finding);
        self.conflicts.extend(run.conflicts);
        self.warnings.extend(run.warnings);
    }

    /// Distinct positions flagged by at least one method.
    pub fn total_duplicates(&self) -> usize {
        self.affected.len()
    }

    pub fn finding(&self, method: DetectionMethod) -> Option<&Finding> {
        self.findings.iter().find(|finding| finding.method == method)
    }

    /// Methods that flagged `position`, in request order.
    pub fn methods_for(&self, position: Position) -> Vec<DetectionMethod> {
        self.findings
            .iter()
            .filter(|finding| finding.affected_positions.contains(&position))
            .map(|finding| finding.method)
            .collect()
    }

    /// Every position belonging to a conflict group.
    pub fn conflict_positions(&self) -> BTreeSet<Position> {
        self.conflicts
            .iter()
            .flat_map(|group| group.member_positions.iter().copied())
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

fn missing_column_warnings(
    method: DetectionMethod,
    selection: &ColumnSelection,
) -> Vec<DetectionWarning> {
    selection
        .missing
        .iter()
        .map(|column| DetectionWarning::ReferencedColumnMissing {
            method,
            column: column.clone(),
        })
        .collect()
}

/// Finding covering every member of every duplicate group in `projection`.
fn grouped_finding(method: DetectionMethod, projection: &Projection, row_count: usize) -> Finding {
    let affected: BTreeSet<Position> = projection
        .duplicate_groups()
        .into_iter()
        .flatten()
        .filter_map(|row| projection.position_at(row))
        .collect();
    Finding::new(method, affected, row_count)
}
