//! Error types for dataset ingestion and output.

use std::path::PathBuf;

use dedupe_model::{DedupeError, ErrorKind};
use thiserror::Error;

/// Errors that can occur while reading or writing a dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Format Errors ===
    /// Extension is not one of the supported formats.
    #[error("unsupported input format '{extension}': {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// CSV reader or writer failure that is not a per-row parse problem.
    #[error("failed to process CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// JSON input that is not an array of objects, or invalid JSON.
    #[error("failed to parse JSON {path}: {message}")]
    Json { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// Rows could not be assembled into a dataset.
    #[error(transparent)]
    Model(#[from] DedupeError),
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::FileNotFound { .. }
            | IngestError::FileRead { .. }
            | IngestError::FileWrite { .. } => ErrorKind::Io,
            IngestError::UnsupportedFormat { .. } => ErrorKind::UnsupportedInputFormat,
            IngestError::Csv { .. } | IngestError::Json { .. } | IngestError::DataFrame { .. } => {
                ErrorKind::ParseFailure
            }
            IngestError::Model(inner) => inner.kind(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/file.csv"),
        };
        assert_eq!(err.to_string(), "input file not found: /path/to/file.csv");
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
        assert_eq!(ingest_err.kind(), ErrorKind::ParseFailure);
    }
}
