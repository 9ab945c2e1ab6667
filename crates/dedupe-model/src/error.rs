use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DedupeError {
    #[error("unsupported input format '{extension}': {path}")]
    UnsupportedInputFormat { path: PathBuf, extension: String },
    #[error("dataset has no rows")]
    EmptyDataset,
    #[error("row {row} has {found} cells, schema has {expected} columns")]
    RowShape {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

impl DedupeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DedupeError::UnsupportedInputFormat { .. } => ErrorKind::UnsupportedInputFormat,
            DedupeError::EmptyDataset => ErrorKind::EmptyDataset,
            DedupeError::RowShape { .. } => ErrorKind::ParseFailure,
            DedupeError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            DedupeError::Io(_) => ErrorKind::Io,
            DedupeError::Message(_) => ErrorKind::Internal,
        }
    }
}

/// Tag carried by a failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedInputFormat,
    EmptyDataset,
    ParseFailure,
    InvalidConfig,
    MethodExecutionFailure,
    Io,
    Internal,
}

pub type Result<T> = std::result::Result<T, DedupeError>;
