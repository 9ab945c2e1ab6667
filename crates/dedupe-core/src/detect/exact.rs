use dedupe_model::DetectionMethod;

use super::{DetectionContext, DuplicateDetector, MethodRun, grouped_finding};
use crate::error::DetectionError;
use crate::normalize::raw_columns;

/// Rows whose every raw cell is identical.
///
/// Key columns do not narrow this method; the whole row is compared.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactDetector;

impl DuplicateDetector for ExactDetector {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::Exact
    }

    fn detect(&self, context: &DetectionContext<'_>) -> Result<MethodRun, DetectionError> {
        let dataset = context.dataset;
        let projection = raw_columns(dataset, &dataset.schema.all_indices())?;
        Ok(MethodRun::new(grouped_finding(
            self.method(),
            &projection,
            dataset.row_count(),
        )))
    }
}
