//! Dataset writers for the resolved output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{Terminator, WriterBuilder};
use serde_json::{Map, Number, Value as JsonValue};
use tracing::debug;

use dedupe_model::{Dataset, Value};

use crate::error::{IngestError, Result};
use crate::format::DataFormat;

/// Write a dataset in `format`, keeping column order and names.
pub fn write_dataset(dataset: &Dataset, path: &Path, format: DataFormat) -> Result<()> {
    match format {
        DataFormat::Json => write_json(dataset, path),
        DataFormat::Csv | DataFormat::Tsv => {
            write_delimited(dataset, path, format.delimiter().unwrap_or(b','))
        }
    }?;
    debug!(
        path = %path.display(),
        rows = dataset.row_count(),
        %format,
        "wrote dataset"
    );
    Ok(())
}

/// Write a header row then one line per record; nulls are empty cells.
pub fn write_delimited(dataset: &Dataset, path: &Path, delimiter: u8) -> Result<()> {
    let csv_error = |error: csv::Error| IngestError::Csv {
        path: path.to_path_buf(),
        message: error.to_string(),
    };
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(csv_error)?;
    writer
        .write_record(dataset.schema.names())
        .map_err(csv_error)?;
    for record in &dataset.records {
        let row: Vec<String> = record
            .values
            .iter()
            .map(|cell| cell.as_ref().map(ToString::to_string).unwrap_or_default())
            .collect();
        writer.write_record(&row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Boolean(v) => JsonValue::Bool(*v),
        Value::Integer(v) => JsonValue::Number(Number::from(*v)),
        Value::Float(v) => Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number),
        Value::Timestamp(_) => JsonValue::String(value.to_string()),
        Value::Text(v) => JsonValue::String(v.clone()),
    }
}

/// Render a dataset as a JSON array of objects.
pub fn dataset_to_json(dataset: &Dataset) -> JsonValue {
    let names: Vec<&str> = dataset.schema.names().collect();
    let rows = dataset
        .records
        .iter()
        .map(|record| {
            let mut object = Map::with_capacity(names.len());
            for (name, cell) in names.iter().zip(&record.values) {
                let value = cell.as_ref().map_or(JsonValue::Null, value_to_json);
                object.insert((*name).to_string(), value);
            }
            JsonValue::Object(object)
        })
        .collect();
    JsonValue::Array(rows)
}

pub fn write_json(dataset: &Dataset, path: &Path) -> Result<()> {
    let write_error = |source: std::io::Error| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &dataset_to_json(dataset)).map_err(|error| {
        IngestError::Json {
            path: path.to_path_buf(),
            message: error.to_string(),
        }
    })?;
    writer.write_all(b"\n").map_err(write_error)?;
    writer.flush().map_err(write_error)
}
