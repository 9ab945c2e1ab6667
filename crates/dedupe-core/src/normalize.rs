//! Projection of a dataset onto comparison keys.
//!
//! A [`Projection`] holds one key per record, built from a subset of columns.
//! Keys are either the raw cells or their normalized form (text trimmed and
//! lower-cased). The dataset itself is never touched.

use std::collections::HashMap;

use dedupe_model::{Cell, Dataset, Position, Value};

use crate::error::DetectionError;

/// Normalized form of a single cell.
pub fn normalize_cell(cell: &Cell) -> Cell {
    cell.as_ref().map(Value::normalized)
}

/// Per-record comparison keys over a fixed set of column indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    columns: Vec<usize>,
    email: bool,
    positions: Vec<Position>,
    keys: Vec<Vec<Cell>>,
}

impl Projection {
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Whether the projection was requested for email comparison.
    ///
    /// Email columns get the same normalization as any other text column.
    pub fn is_email(&self) -> bool {
        self.email
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key of the record stored at `row` in the source dataset.
    pub fn key_at(&self, row: usize) -> Option<&[Cell]> {
        self.keys.get(row).map(Vec::as_slice)
    }

    pub fn position_at(&self, row: usize) -> Option<Position> {
        self.positions.get(row).copied()
    }

    pub fn key_of(&self, position: Position) -> Option<&[Cell]> {
        let row = self.positions.iter().position(|p| *p == position)?;
        self.key_at(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &[Cell])> + '_ {
        self.positions
            .iter()
            .copied()
            .zip(self.keys.iter().map(Vec::as_slice))
    }

    /// Rows sharing a key, as indices into the source dataset's records.
    ///
    /// Members are in ascending position order and groups are ordered by
    /// their first member's position. Singletons are included.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut order: Vec<usize> = (0..self.positions.len()).collect();
        order.sort_by_key(|&row| self.positions[row]);

        let mut group_of: HashMap<&[Cell], usize> = HashMap::with_capacity(order.len());
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for row in order {
            let key = self.keys[row].as_slice();
            match group_of.get(key) {
                Some(&group) => groups[group].push(row),
                None => {
                    group_of.insert(key, groups.len());
                    groups.push(vec![row]);
                }
            }
        }
        groups
    }

    /// Groups with at least two members.
    pub fn duplicate_groups(&self) -> Vec<Vec<usize>> {
        self.groups()
            .into_iter()
            .filter(|group| group.len() > 1)
            .collect()
    }
}

fn project(
    dataset: &Dataset,
    columns: &[usize],
    email: bool,
    normalize: bool,
) -> Result<Projection, DetectionError> {
    let expected = dataset.column_count();
    let mut positions = Vec::with_capacity(dataset.row_count());
    let mut keys = Vec::with_capacity(dataset.row_count());
    for record in &dataset.records {
        if record.values.len() != expected {
            return Err(DetectionError::RecordShape {
                position: record.position,
                expected,
                found: record.values.len(),
            });
        }
        let mut key = Vec::with_capacity(columns.len());
        for &column in columns {
            let cell = record
                .value(column)
                .ok_or(DetectionError::RecordShape {
                    position: record.position,
                    expected,
                    found: record.values.len(),
                })?;
            key.push(if normalize {
                normalize_cell(cell)
            } else {
                cell.clone()
            });
        }
        positions.push(record.position);
        keys.push(key);
    }
    Ok(Projection {
        columns: columns.to_vec(),
        email,
        positions,
        keys,
    })
}

/// Normalized keys over `columns`.
///
/// # Errors
///
/// Fails with [`DetectionError::RecordShape`] when a record does not match
/// the schema width.
pub fn normalize_columns(
    dataset: &Dataset,
    columns: &[usize],
    email: bool,
) -> Result<Projection, DetectionError> {
    project(dataset, columns, email, true)
}

/// Raw (unnormalized) keys over `columns`.
pub fn raw_columns(dataset: &Dataset, columns: &[usize]) -> Result<Projection, DetectionError> {
    project(dataset, columns, false, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedupe_model::{Column, ColumnType, Record, Schema};

    fn people() -> Dataset {
        Dataset::from_rows(
            Schema::new(vec![
                Column::new("name", ColumnType::String),
                Column::new("age", ColumnType::Integer),
            ]),
            vec![
                vec![Some(Value::from("  Ann ")), Some(Value::Integer(30))],
                vec![Some(Value::from("bob")), None],
                vec![Some(Value::from("ann")), Some(Value::Integer(30))],
            ],
        )
        .expect("dataset")
    }

    #[test]
    fn normalizes_text_only() {
        let data = people();
        let projection = normalize_columns(&data, &[0, 1], false).expect("projection");
        assert_eq!(
            projection.key_of(Position(0)),
            Some(&[Some(Value::from("ann")), Some(Value::Integer(30))][..])
        );
        assert_eq!(data.records[0].values[0], Some(Value::from("  Ann ")));
    }

    #[test]
    fn groups_follow_position_order() {
        let data = people();
        let projection = normalize_columns(&data, &[0], false).expect("projection");
        assert_eq!(projection.groups(), vec![vec![0, 2], vec![1]]);
        assert_eq!(projection.duplicate_groups(), vec![vec![0, 2]]);

        let raw = raw_columns(&data, &[0]).expect("projection");
        assert!(raw.duplicate_groups().is_empty());
    }

    #[test]
    fn ragged_record_is_a_shape_error() {
        let mut data = people();
        data.records.push(Record {
            position: Position(3),
            values: vec![None],
        });
        let err = normalize_columns(&data, &[0], false).expect_err("shape");
        assert!(matches!(
            err,
            DetectionError::RecordShape {
                position: Position(3),
                expected: 2,
                found: 1
            }
        ));
    }
}
