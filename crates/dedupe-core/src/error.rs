//! Error types for detection and resolution.

use thiserror::Error;

use dedupe_model::{DedupeError, DetectionMethod, ErrorKind, Position};

/// A failure inside one detection method.
///
/// These never abort a detection pass; the detector records them as
/// [`MethodFailure`](crate::detect::MethodFailure)s and carries on.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("record at position {position} has {found} cells but the schema has {expected}")]
    RecordShape {
        position: Position,
        expected: usize,
        found: usize,
    },

    #[error("{method} failed: {message}")]
    MethodExecution {
        method: DetectionMethod,
        message: String,
    },
}

/// Errors that stop a whole engine run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] DedupeError),

    #[error("resolution failed: {0}")]
    Resolution(#[source] DetectionError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Model(error) => error.kind(),
            EngineError::Resolution(_) => ErrorKind::MethodExecutionFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_kinds() {
        assert_eq!(
            EngineError::from(DedupeError::EmptyDataset).kind(),
            ErrorKind::EmptyDataset
        );
        let shape = DetectionError::RecordShape {
            position: Position(2),
            expected: 3,
            found: 1,
        };
        assert_eq!(
            EngineError::Resolution(shape).kind(),
            ErrorKind::MethodExecutionFailure
        );
    }
}
