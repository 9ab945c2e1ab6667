use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DedupeError, Result};
use crate::schema::Schema;
use crate::value::Cell;

/// Zero-based load-time index of a record.
///
/// Assigned once when the dataset is built and never renumbered; findings
/// computed against the original dataset refer to records by position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Position(pub usize);

impl Position {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Position {
    fn from(value: usize) -> Self {
        Position(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub position: Position,
    /// One cell per schema column, in schema order.
    pub values: Vec<Cell>,
}

impl Record {
    pub fn value(&self, column: usize) -> Option<&Cell> {
        self.values.get(column)
    }
}

/// An ordered set of records sharing one schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub schema: Schema,
    pub records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, assigning positions `0..n` in row order.
    ///
    /// # Errors
    ///
    /// Returns [`DedupeError::RowShape`] when a row does not have exactly one
    /// cell per schema column.
    pub fn from_rows(schema: Schema, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let width = schema.len();
        let mut records = Vec::with_capacity(rows.len());
        for (idx, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(DedupeError::RowShape {
                    row: idx,
                    expected: width,
                    found: values.len(),
                });
            }
            records.push(Record {
                position: Position(idx),
                values,
            });
        }
        Ok(Self { schema, records })
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record lookup by original position.
    ///
    /// Positions of a freshly loaded dataset equal their index, so this is a
    /// direct index with a position check.
    pub fn record(&self, position: Position) -> Option<&Record> {
        self.records
            .get(position.index())
            .filter(|record| record.position == position)
            .or_else(|| self.records.iter().find(|record| record.position == position))
    }

    pub fn value(&self, position: Position, column: &str) -> Option<&Cell> {
        let idx = self.schema.index_of(column)?;
        self.record(position)?.value(idx)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.records.iter().map(|record| record.position)
    }
}
