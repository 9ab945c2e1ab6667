pub mod dataset;
pub mod detection;
pub mod error;
pub mod options;
pub mod processing;
pub mod resolution;
pub mod schema;
pub mod value;

pub use dataset::{Dataset, Position, Record};
pub use detection::{ConflictGroup, DetectionMethod, Finding, percentage};
pub use error::{DedupeError, ErrorKind, Result};
pub use options::{ConflictPolicy, DedupeOptions, NullHandling, ScoringOptions};
pub use processing::{DedupeResponse, ResponseStatus};
pub use resolution::{MergeStrategy, ResolutionOutcome};
pub use schema::{Column, ColumnType, Schema};
pub use value::{Cell, Value, format_numeric};
