use dedupe_model::DetectionMethod;

use super::{
    DetectionContext, DetectionWarning, DuplicateDetector, MethodRun, grouped_finding,
    missing_column_warnings,
};
use crate::columns::{comparison_columns, select_columns};
use crate::error::DetectionError;
use crate::normalize::normalize_columns;

/// Rows equal after normalizing email addresses.
///
/// Uses the same comparison set and normalization as
/// [`CaseInsensitiveDetector`](super::CaseInsensitiveDetector), but only runs
/// when an email column is part of that set.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailNormalizedDetector;

impl DuplicateDetector for EmailNormalizedDetector {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::EmailNormalized
    }

    fn detect(&self, context: &DetectionContext<'_>) -> Result<MethodRun, DetectionError> {
        let method = self.method();
        let dataset = context.dataset;
        if context.email_columns.is_empty() {
            return Ok(MethodRun::skipped(method, "no email columns found"));
        }

        let emails = select_columns(&dataset.schema, context.email_columns);
        let selection = comparison_columns(&dataset.schema, context.key_columns);
        let mut warnings: Vec<DetectionWarning> = missing_column_warnings(method, &emails);
        warnings.extend(missing_column_warnings(method, &selection));

        if !emails.indices.iter().any(|&idx| selection.contains(idx)) {
            return Ok(
                MethodRun::skipped(method, "no email column in the comparison columns")
                    .with_warnings(warnings),
            );
        }
        let projection = normalize_columns(dataset, &selection.indices, true)?;
        Ok(
            MethodRun::new(grouped_finding(method, &projection, dataset.row_count()))
                .with_warnings(warnings),
        )
    }
}
