//! Report model built from a finished engine run.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use dedupe_core::{DedupeRun, DetectionWarning, ImpactScore, MethodFailure};
use dedupe_model::{ConflictGroup, DetectionMethod, MergeStrategy, Position};

use crate::severity::Severity;

/// Affected positions listed per method.
pub const AFFECTED_SAMPLE_LIMIT: usize = 100;
/// Conflict groups listed in full.
pub const CONFLICT_LIMIT: usize = 100;
/// Per-record entries in `row_level_findings`.
pub const ROW_FINDING_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSummary {
    pub count: usize,
    pub percentage: f64,
    /// First [`AFFECTED_SAMPLE_LIMIT`] positions in ascending order.
    pub affected_positions: Vec<Position>,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFinding {
    pub position: Position,
    pub methods: Vec<DetectionMethod>,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DedupeReport {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub rows_in: usize,
    pub rows_out: usize,
    pub total_duplicates: usize,
    pub email_columns: Vec<String>,
    pub per_method: BTreeMap<DetectionMethod, MethodSummary>,
    pub conflicts_total: usize,
    pub conflicts: Vec<ConflictGroup>,
    pub strategy_used: MergeStrategy,
    pub removed_or_merged: usize,
    pub resolution_log: Vec<String>,
    pub dedup_score: ImpactScore,
    pub row_level_findings_total: usize,
    pub row_level_findings: Vec<RowFinding>,
    pub warnings: Vec<DetectionWarning>,
    pub method_failures: Vec<MethodFailure>,
}

impl DedupeReport {
    /// Summarize `run`, capping the long lists.
    pub fn from_run(run: &DedupeRun) -> Self {
        let detection = &run.detection;
        let resolution = &run.resolution;

        let per_method = detection
            .findings
            .iter()
            .map(|finding| {
                let summary = MethodSummary {
                    count: finding.count,
                    percentage: finding.percentage_of_dataset,
                    affected_positions: finding
                        .affected_positions
                        .iter()
                        .take(AFFECTED_SAMPLE_LIMIT)
                        .copied()
                        .collect(),
                    truncated: finding.count > AFFECTED_SAMPLE_LIMIT,
                };
                (finding.method, summary)
            })
            .collect();

        let mut row_level_findings: Vec<RowFinding> = detection
            .affected
            .iter()
            .filter_map(|&position| {
                let methods = detection.methods_for(position);
                let severity = Severity::for_methods(&methods)?;
                Some(RowFinding {
                    position,
                    methods,
                    severity,
                })
            })
            .collect();
        let row_level_findings_total = row_level_findings.len();
        row_level_findings.sort_by_key(|finding| (finding.severity, finding.position));
        row_level_findings.truncate(ROW_FINDING_LIMIT);

        Self {
            generated_at: Utc::now(),
            source: None,
            rows_in: detection.row_count,
            rows_out: resolution.resolved_dataset.row_count(),
            total_duplicates: detection.total_duplicates(),
            email_columns: run.classification.clone(),
            per_method,
            conflicts_total: detection.conflicts.len(),
            conflicts: detection
                .conflicts
                .iter()
                .take(CONFLICT_LIMIT)
                .cloned()
                .collect(),
            strategy_used: resolution.strategy_used,
            removed_or_merged: resolution.removed_count(),
            resolution_log: resolution.human_log.clone(),
            dedup_score: run.score,
            row_level_findings_total,
            row_level_findings,
            warnings: detection.warnings.clone(),
            method_failures: detection.failures.clone(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn has_conflicts(&self) -> bool {
        self.conflicts_total > 0
    }
}
