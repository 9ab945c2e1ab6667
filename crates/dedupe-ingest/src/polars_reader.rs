//! Polars-based reading for large delimited files.
//!
//! Files at or above [`DEFAULT_STREAMING_THRESHOLD_BYTES`] are parsed by
//! Polars instead of the row-by-row `csv` reader, then converted into a
//! [`Dataset`]. Files are read with every column as text and typed by the
//! same inference as the small-file path, so both paths produce the same
//! dataset. Frames built in memory keep their numeric and boolean dtypes.

use std::path::Path;

use polars::prelude::{AnyValue, Column as FrameColumn, CsvReadOptions, DataFrame, SerReader};
use tracing::debug;

use dedupe_model::{Cell, Column, ColumnType, Dataset, Schema, Value};

use crate::error::{IngestError, Result};
use crate::infer::{infer_column_type, parse_cell};

/// Default file size threshold (in bytes) above which Polars is used.
/// Default: 10 MB
pub const DEFAULT_STREAMING_THRESHOLD_BYTES: u64 = 10 * 1024 * 1024;

/// Check if a file should be read through Polars based on its size.
pub fn should_use_streaming(path: impl AsRef<Path>) -> bool {
    should_use_streaming_with_threshold(path, DEFAULT_STREAMING_THRESHOLD_BYTES)
}

/// Check if a file should be read through Polars based on a custom threshold.
pub fn should_use_streaming_with_threshold(path: impl AsRef<Path>, threshold_bytes: u64) -> bool {
    std::fs::metadata(path.as_ref())
        .map(|m| m.len() >= threshold_bytes)
        .unwrap_or(false)
}

/// Read a delimited file into a Polars DataFrame.
///
/// Every column is read as text; typing happens in [`frame_to_dataset`].
pub fn read_frame(path: &Path, delimiter: u8) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| options.with_separator(delimiter))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read frame with polars"
    );
    Ok(df)
}

/// Converts a Polars AnyValue to a typed cell.
pub fn any_to_cell(value: AnyValue<'_>) -> Cell {
    match value {
        AnyValue::Null => None,
        AnyValue::Boolean(v) => Some(Value::Boolean(v)),
        AnyValue::Int8(v) => Some(Value::Integer(i64::from(v))),
        AnyValue::Int16(v) => Some(Value::Integer(i64::from(v))),
        AnyValue::Int32(v) => Some(Value::Integer(i64::from(v))),
        AnyValue::Int64(v) => Some(Value::Integer(v)),
        AnyValue::UInt8(v) => Some(Value::Integer(i64::from(v))),
        AnyValue::UInt16(v) => Some(Value::Integer(i64::from(v))),
        AnyValue::UInt32(v) => Some(Value::Integer(i64::from(v))),
        AnyValue::UInt64(v) => Some(
            i64::try_from(v).map_or_else(|_| Value::Float(v as f64), Value::Integer),
        ),
        AnyValue::Float32(v) => Some(Value::Float(f64::from(v))),
        AnyValue::Float64(v) => Some(Value::Float(v)),
        AnyValue::String(s) => Some(Value::Text(s.to_string())),
        AnyValue::StringOwned(s) => Some(Value::Text(s.to_string())),
        other => Some(Value::Text(other.to_string())),
    }
}

/// Converts a Polars AnyValue to its raw text, `None` for nulls.
fn any_to_raw(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        other => Some(other.to_string()),
    }
}

fn convert_column(column: &FrameColumn) -> Result<(ColumnType, Vec<Cell>)> {
    let dtype = column.dtype();
    let len = column.len();
    let typed = if dtype.is_bool() {
        Some(ColumnType::Boolean)
    } else if dtype.is_integer() {
        Some(ColumnType::Integer)
    } else if dtype.is_float() {
        Some(ColumnType::Float)
    } else if dtype.is_null() {
        Some(ColumnType::Null)
    } else {
        None
    };
    if let Some(column_type) = typed {
        let mut cells = Vec::with_capacity(len);
        for idx in 0..len {
            cells.push(any_to_cell(column.get(idx)?));
        }
        return Ok((column_type, cells));
    }
    let mut raw = Vec::with_capacity(len);
    for idx in 0..len {
        raw.push(any_to_raw(column.get(idx)?));
    }
    let column_type = infer_column_type(raw.iter().map(Option::as_deref));
    let cells = raw
        .iter()
        .map(|value| value.as_deref().and_then(|v| parse_cell(v, column_type)))
        .collect();
    Ok((column_type, cells))
}

/// Convert a DataFrame into a dataset, preserving column order.
pub fn frame_to_dataset(df: &DataFrame) -> Result<Dataset> {
    let height = df.height();
    let mut columns = Vec::with_capacity(df.width());
    let mut column_cells = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let (column_type, cells) = convert_column(column)?;
        columns.push(Column::new(column.name().to_string(), column_type));
        column_cells.push(cells);
    }
    let mut rows: Vec<Vec<Cell>> = (0..height)
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for cells in column_cells {
        if cells.len() != height {
            return Err(IngestError::DataFrame {
                message: format!("column length {} differs from frame height {height}", cells.len()),
            });
        }
        for (row, cell) in rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }
    Ok(Dataset::from_rows(Schema::new(columns), rows)?)
}

/// Read a large delimited file through Polars.
pub fn read_delimited_with_polars(path: &Path, delimiter: u8) -> Result<Dataset> {
    let df = read_frame(path, delimiter)?;
    frame_to_dataset(&df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    #[test]
    fn converts_frame_columns_with_types() {
        let df = DataFrame::new(vec![
            Series::new("id".into(), vec![1i64, 2, 3]).into_column(),
            Series::new("email".into(), vec![Some("a@x.io"), None, Some("B@x.io")])
                .into_column(),
            Series::new("joined".into(), vec!["2024-01-01", "2024-02-01", "2024-03-01"])
                .into_column(),
        ])
        .expect("frame");
        let dataset = frame_to_dataset(&df).expect("dataset");
        let types: Vec<ColumnType> = dataset
            .schema
            .columns()
            .iter()
            .map(|column| column.column_type)
            .collect();
        assert_eq!(
            types,
            vec![ColumnType::Integer, ColumnType::String, ColumnType::Timestamp]
        );
        assert_eq!(dataset.records[1].values[1], None);
        assert_eq!(dataset.records[2].values[0], Some(Value::Integer(3)));
    }

    #[test]
    fn late_text_value_keeps_column_as_text() {
        let mut amounts: Vec<String> = (0..200).map(|n| n.to_string()).collect();
        amounts[150] = "N/A".to_string();
        let df = DataFrame::new(vec![Series::new("amount".into(), amounts).into_column()])
            .expect("frame");
        let dataset = frame_to_dataset(&df).expect("dataset");
        assert_eq!(dataset.schema.columns()[0].column_type, ColumnType::String);
        assert_eq!(dataset.records[150].values[0], Some(Value::from("N/A")));
        assert_eq!(dataset.records[149].values[0], Some(Value::from("149")));
    }
}
