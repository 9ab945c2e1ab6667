use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value as JsonValue;
use tracing::warn;

use dedupe_model::{Cell, Column, ColumnType, Dataset, Schema, Value};

use crate::error::{IngestError, Result};
use crate::infer::parse_timestamp;

/// Read a JSON array of objects into a dataset.
///
/// Columns appear in first-seen key order. Elements that are not objects are
/// skipped and counted; missing keys are nulls.
pub fn read_json(path: &Path) -> Result<(Dataset, usize)> {
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: JsonValue =
        serde_json::from_reader(BufReader::new(file)).map_err(|error| IngestError::Json {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
    let JsonValue::Array(items) = parsed else {
        return Err(IngestError::Json {
            path: path.to_path_buf(),
            message: "expected a top-level array of objects".to_string(),
        });
    };
    json_rows_to_dataset(path, items)
}

fn json_rows_to_dataset(path: &Path, items: Vec<JsonValue>) -> Result<(Dataset, usize)> {
    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for (idx, item) in items.into_iter().enumerate() {
        let JsonValue::Object(map) = item else {
            warn!(path = %path.display(), element = idx, "skipping non-object element");
            skipped += 1;
            continue;
        };
        for key in map.keys() {
            if !headers.iter().any(|header| header == key) {
                headers.push(key.clone());
            }
        }
        objects.push(map);
    }

    let mut columns = Vec::with_capacity(headers.len());
    let mut column_cells: Vec<Vec<Cell>> = Vec::with_capacity(headers.len());
    for header in &headers {
        let raw: Vec<Option<&JsonValue>> = objects
            .iter()
            .map(|object| object.get(header).filter(|value| !value.is_null()))
            .collect();
        let column_type = json_column_type(&raw);
        column_cells.push(
            raw.iter()
                .map(|value| value.and_then(|v| json_to_cell(v, column_type)))
                .collect(),
        );
        columns.push(Column::new(header.clone(), column_type));
    }

    let mut rows: Vec<Vec<Cell>> = (0..objects.len())
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for cells in column_cells {
        for (row, cell) in rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }
    let dataset = Dataset::from_rows(Schema::new(columns), rows)?;
    Ok((dataset, skipped))
}

fn json_column_type(values: &[Option<&JsonValue>]) -> ColumnType {
    let present: Vec<&JsonValue> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return ColumnType::Null;
    }
    if present.iter().all(|value| value.is_boolean()) {
        ColumnType::Boolean
    } else if present.iter().all(|value| value.is_i64()) {
        ColumnType::Integer
    } else if present.iter().all(|value| value.is_number()) {
        ColumnType::Float
    } else if present
        .iter()
        .all(|value| value.as_str().is_some_and(|s| parse_timestamp(s).is_some()))
    {
        ColumnType::Timestamp
    } else {
        ColumnType::String
    }
}

fn json_to_cell(value: &JsonValue, column_type: ColumnType) -> Cell {
    let typed = match (column_type, value) {
        (ColumnType::Boolean, JsonValue::Bool(v)) => Some(Value::Boolean(*v)),
        (ColumnType::Integer, JsonValue::Number(n)) => n.as_i64().map(Value::Integer),
        (ColumnType::Float, JsonValue::Number(n)) => n.as_f64().map(Value::Float),
        (ColumnType::Timestamp, JsonValue::String(s)) => parse_timestamp(s).map(Value::Timestamp),
        _ => None,
    };
    if typed.is_some() {
        return typed;
    }
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) if s.trim().is_empty() => None,
        JsonValue::String(s) => Some(Value::Text(s.clone())),
        other => Some(Value::Text(other.to_string())),
    }
}
