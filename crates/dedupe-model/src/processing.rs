use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DedupeError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Outcome of one invocation as seen from outside the engine.
///
/// Fatal conditions are reported here with a kind tag instead of escaping as
/// a panic; a failed response never carries output paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupeResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub message: String,
    pub elapsed_ms: u128,
    pub rows_in: usize,
    pub rows_out: usize,
    pub total_duplicates: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

impl DedupeResponse {
    pub fn success(
        message: impl Into<String>,
        elapsed_ms: u128,
        rows_in: usize,
        rows_out: usize,
        total_duplicates: usize,
    ) -> Self {
        Self {
            status: ResponseStatus::Success,
            error_kind: None,
            message: message.into(),
            elapsed_ms,
            rows_in,
            rows_out,
            total_duplicates,
            output_path: None,
            report_path: None,
        }
    }

    pub fn with_output_path(mut self, path: Option<PathBuf>) -> Self {
        self.output_path = path;
        self
    }

    pub fn with_report_path(mut self, path: Option<PathBuf>) -> Self {
        self.report_path = path;
        self
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>, elapsed_ms: u128) -> Self {
        Self {
            status: ResponseStatus::Error,
            error_kind: Some(kind),
            message: message.into(),
            elapsed_ms,
            rows_in: 0,
            rows_out: 0,
            total_duplicates: 0,
            output_path: None,
            report_path: None,
        }
    }

    pub fn from_error(error: &DedupeError, elapsed_ms: u128) -> Self {
        Self::failure(error.kind(), error.to_string(), elapsed_ms)
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}
