//! Structured reports for a deduplication run.
//!
//! [`DedupeReport`] is a serializable summary of a [`dedupe_core::DedupeRun`]:
//! per-method counts, conflict groups, the resolution log, the impact score,
//! and per-record findings ranked by [`Severity`]. Long lists are capped.

pub mod error;
pub mod report;
pub mod severity;
pub mod writer;

pub use error::{ReportError, Result};
pub use report::{
    AFFECTED_SAMPLE_LIMIT, CONFLICT_LIMIT, DedupeReport, MethodSummary, ROW_FINDING_LIMIT,
    RowFinding,
};
pub use severity::Severity;
pub use writer::{report_to_json, write_report_json};
