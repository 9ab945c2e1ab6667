use dedupe_model::DetectionMethod;

use super::{
    DetectionContext, DuplicateDetector, MethodRun, grouped_finding, missing_column_warnings,
};
use crate::columns::comparison_columns;
use crate::error::DetectionError;
use crate::normalize::normalize_columns;

/// Rows equal after trimming and lower-casing text, over the key columns or
/// every column when none are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveDetector;

impl DuplicateDetector for CaseInsensitiveDetector {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::CaseInsensitive
    }

    fn detect(&self, context: &DetectionContext<'_>) -> Result<MethodRun, DetectionError> {
        let method = self.method();
        let dataset = context.dataset;
        let selection = comparison_columns(&dataset.schema, context.key_columns);
        let warnings = missing_column_warnings(method, &selection);
        if selection.is_empty() {
            return Ok(MethodRun::skipped(method, "none of the key columns exist")
                .with_warnings(warnings));
        }
        let projection = normalize_columns(dataset, &selection.indices, false)?;
        Ok(
            MethodRun::new(grouped_finding(method, &projection, dataset.row_count()))
                .with_warnings(warnings),
        )
    }
}
