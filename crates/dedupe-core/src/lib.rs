//! Duplicate detection and resolution over an in-memory [`Dataset`].
//!
//! The pipeline is a straight chain:
//!
//! 1. [`classify`] picks the email columns.
//! 2. [`detect`] runs each requested method in isolation and unions the
//!    results; [`conflicts`] finds key groups whose values disagree.
//! 3. [`resolve`] collapses duplicate groups, leaving conflicts for review.
//! 4. [`score`] rates the change.
//!
//! [`DedupeEngine`] drives all four for one dataset.
//!
//! [`Dataset`]: dedupe_model::Dataset

pub mod classify;
pub mod columns;
pub mod conflicts;
pub mod detect;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod resolve;
pub mod score;

pub use classify::{classify_email_columns, looks_like_email};
pub use columns::{ColumnSelection, comparison_columns, select_columns};
pub use conflicts::detect_conflicts;
pub use detect::{
    DetectionContext, DetectionReport, DetectionWarning, DetectorRegistry, DuplicateDetector,
    MethodFailure, MethodRun, default_registry, detect_duplicates,
};
pub use engine::{DedupeEngine, DedupeRun};
pub use error::{DetectionError, EngineError, Result};
pub use normalize::{Projection, normalize_cell, normalize_columns, raw_columns};
pub use resolve::resolve;
pub use score::{ImpactScore, QualityLabel, score_impact};
