//! Key conflicts: records that share a key but disagree elsewhere.

use std::collections::{BTreeSet, HashSet};

use dedupe_model::{Cell, ConflictGroup, Dataset, Value};

use crate::error::DetectionError;
use crate::normalize::normalize_columns;

/// Find groups of records sharing a normalized key over `key_columns` where
/// some non-key column holds more than one distinct raw value.
///
/// Nulls are ignored when comparing, so a null next to a value is something
/// merging can fill rather than a divergence. Groups are returned in order of
/// their first member.
///
/// # Errors
///
/// Fails when a record's width does not match the schema.
pub fn detect_conflicts(
    dataset: &Dataset,
    key_columns: &[usize],
) -> Result<Vec<ConflictGroup>, DetectionError> {
    if key_columns.is_empty() {
        return Ok(Vec::new());
    }
    let projection = normalize_columns(dataset, key_columns, false)?;
    let other_columns: Vec<usize> = dataset
        .schema
        .all_indices()
        .into_iter()
        .filter(|idx| !key_columns.contains(idx))
        .collect();

    let mut conflicts = Vec::new();
    for rows in projection.duplicate_groups() {
        let mut diverging_columns = BTreeSet::new();
        for &column in &other_columns {
            let distinct: HashSet<&Value> = rows
                .iter()
                .filter_map(|&row| dataset.records[row].value(column)?.as_ref())
                .collect();
            if distinct.len() > 1
                && let Some(name) = dataset.schema.column(column)
            {
                diverging_columns.insert(name.name.clone());
            }
        }
        if diverging_columns.is_empty() {
            continue;
        }
        let normalized_key = projection
            .key_at(rows[0])
            .map(<[Cell]>::to_vec)
            .unwrap_or_default();
        conflicts.push(ConflictGroup {
            normalized_key,
            member_positions: rows
                .iter()
                .map(|&row| dataset.records[row].position)
                .collect(),
            diverging_columns,
        });
    }
    Ok(conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedupe_model::{Column, ColumnType, Position, Schema};

    fn orders(rows: Vec<(i64, Option<f64>, &str)>) -> Dataset {
        Dataset::from_rows(
            Schema::new(vec![
                Column::new("id", ColumnType::Integer),
                Column::new("amount", ColumnType::Float),
                Column::new("status", ColumnType::String),
            ]),
            rows.into_iter()
                .map(|(id, amount, status)| {
                    vec![
                        Some(Value::Integer(id)),
                        amount.map(Value::Float),
                        Some(Value::from(status)),
                    ]
                })
                .collect(),
        )
        .expect("dataset")
    }

    #[test]
    fn differing_amount_is_a_conflict() {
        let data = orders(vec![
            (1, Some(10.0), "open"),
            (2, Some(5.0), "open"),
            (1, Some(12.5), "open"),
        ]);
        let conflicts = detect_conflicts(&data, &[0]).expect("conflicts");
        assert_eq!(conflicts.len(), 1);
        let group = &conflicts[0];
        assert_eq!(group.normalized_key, vec![Some(Value::Integer(1))]);
        assert_eq!(
            group.member_positions.iter().copied().collect::<Vec<_>>(),
            vec![Position(0), Position(2)]
        );
        assert_eq!(
            group.diverging_columns.iter().cloned().collect::<Vec<_>>(),
            vec!["amount".to_string()]
        );
    }

    #[test]
    fn identical_non_key_values_are_not_a_conflict() {
        let data = orders(vec![(1, Some(10.0), "open"), (1, Some(10.0), "open")]);
        assert!(detect_conflicts(&data, &[0]).expect("conflicts").is_empty());
    }

    #[test]
    fn null_against_value_is_not_a_conflict() {
        let data = orders(vec![(1, None, "open"), (1, Some(10.0), "open")]);
        assert!(detect_conflicts(&data, &[0]).expect("conflicts").is_empty());
    }

    #[test]
    fn nulls_do_not_hide_a_real_divergence() {
        let data = orders(vec![
            (1, None, "open"),
            (1, Some(10.0), "open"),
            (1, Some(12.0), "open"),
        ]);
        let conflicts = detect_conflicts(&data, &[0]).expect("conflicts");
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].member_positions.len(), 3);
        assert!(conflicts[0].diverging_columns.contains("amount"));
    }

    #[test]
    fn raw_case_difference_in_non_key_column_diverges() {
        let data = orders(vec![(1, Some(1.0), "Open"), (1, Some(1.0), "open")]);
        let conflicts = detect_conflicts(&data, &[0]).expect("conflicts");
        assert!(conflicts[0].diverging_columns.contains("status"));
    }
}
