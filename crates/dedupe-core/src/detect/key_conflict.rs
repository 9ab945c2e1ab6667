use std::collections::BTreeSet;

use dedupe_model::{DetectionMethod, Finding, Position};

use super::{DetectionContext, DuplicateDetector, MethodRun, missing_column_warnings};
use crate::columns::select_columns;
use crate::conflicts::detect_conflicts;
use crate::error::DetectionError;

/// Records sharing a key value whose other columns disagree.
///
/// Needs key columns; without them the method reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyConflictDetector;

impl DuplicateDetector for KeyConflictDetector {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::KeyConflict
    }

    fn detect(&self, context: &DetectionContext<'_>) -> Result<MethodRun, DetectionError> {
        let method = self.method();
        let dataset = context.dataset;
        if context.key_columns.is_empty() {
            return Ok(MethodRun::skipped(method, "no key columns configured"));
        }
        let selection = select_columns(&dataset.schema, context.key_columns);
        let warnings = missing_column_warnings(method, &selection);
        if selection.is_empty() {
            return Ok(MethodRun::skipped(method, "none of the key columns exist")
                .with_warnings(warnings));
        }

        let conflicts = detect_conflicts(dataset, &selection.indices)?;
        let affected: BTreeSet<Position> = conflicts
            .iter()
            .flat_map(|group| group.member_positions.iter().copied())
            .collect();
        let mut run = MethodRun::new(Finding::new(method, affected, dataset.row_count()))
            .with_warnings(warnings);
        run.conflicts = conflicts;
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedupe_model::{Column, ColumnType, Dataset, Schema, Value};

    fn data() -> Dataset {
        Dataset::from_rows(
            Schema::new(vec![
                Column::new("id", ColumnType::String),
                Column::new("amount", ColumnType::Integer),
            ]),
            vec![
                vec![Some(Value::from("A1")), Some(Value::Integer(10))],
                vec![Some(Value::from("a1 ")), Some(Value::Integer(20))],
                vec![Some(Value::from("B2")), Some(Value::Integer(5))],
            ],
        )
        .expect("dataset")
    }

    #[test]
    fn key_is_normalized_before_grouping() {
        let data = data();
        let keys = vec!["id".to_string()];
        let context = DetectionContext {
            dataset: &data,
            key_columns: &keys,
            email_columns: &[],
        };
        let run = KeyConflictDetector.detect(&context).expect("detect");
        assert_eq!(run.finding.count, 2);
        assert_eq!(run.conflicts.len(), 1);
        assert_eq!(run.conflicts[0].normalized_key, vec![Some(Value::from("a1"))]);
    }

    #[test]
    fn without_keys_reports_nothing() {
        let data = data();
        let context = DetectionContext {
            dataset: &data,
            key_columns: &[],
            email_columns: &[],
        };
        let run = KeyConflictDetector.detect(&context).expect("detect");
        assert!(run.finding.is_empty());
        assert!(run.conflicts.is_empty());
        assert_eq!(run.warnings.len(), 1);
    }
}
