use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{ReportError, Result};
use crate::report::DedupeReport;

/// Pretty-printed JSON with a trailing newline.
pub fn report_to_json(report: &DedupeReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

pub fn write_report_json(report: &DedupeReport, path: &Path) -> Result<()> {
    let json = report_to_json(report)?;
    fs::write(path, json).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        total_duplicates = report.total_duplicates,
        conflicts = report.conflicts_total,
        "wrote report"
    );
    Ok(())
}
