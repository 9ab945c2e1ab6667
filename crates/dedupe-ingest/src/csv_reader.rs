use std::path::Path;

use csv::ReaderBuilder;
use tracing::warn;

use dedupe_model::{Column, Dataset, Schema};

use crate::error::{IngestError, Result};
use crate::infer::{infer_column_type, parse_cell};

/// Raw delimited text: one header row plus equally wide data rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows dropped because their field count did not match the header.
    pub skipped_rows: usize,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Read a delimited file without interpreting cell types.
///
/// The first non-blank record is the header. Malformed rows (wrong field
/// count or undecodable) are skipped and counted rather than failing the read.
pub fn read_raw_table(path: &Path, delimiter: u8) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|error| csv_error(path, &error))?;
    let mut table = RawTable::default();
    let mut header_seen = false;
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(error) if error.is_io_error() => return Err(csv_error(path, &error)),
            Err(error) => {
                warn!(path = %path.display(), line, %error, "skipping unreadable row");
                table.skipped_rows += 1;
                continue;
            }
        };
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        if !header_seen {
            table.headers = record.iter().map(normalize_header).collect();
            header_seen = true;
            continue;
        }
        if record.len() != table.headers.len() {
            warn!(
                path = %path.display(),
                line,
                expected = table.headers.len(),
                found = record.len(),
                "skipping row with mismatched field count"
            );
            table.skipped_rows += 1;
            continue;
        }
        table.rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}

/// Build a typed dataset from a raw table, inferring one type per column.
pub fn raw_table_to_dataset(table: &RawTable) -> Result<Dataset> {
    let mut columns = Vec::with_capacity(table.headers.len());
    for (idx, header) in table.headers.iter().enumerate() {
        let column_type = infer_column_type(
            table
                .rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str)),
        );
        columns.push(Column::new(header.clone(), column_type));
    }
    let rows = table
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    let raw = row.get(idx).map(String::as_str).unwrap_or("");
                    parse_cell(raw, column.column_type)
                })
                .collect()
        })
        .collect();
    Ok(Dataset::from_rows(Schema::new(columns), rows)?)
}

/// Read a delimited file into a typed dataset.
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<(Dataset, usize)> {
    let table = read_raw_table(path, delimiter)?;
    let dataset = raw_table_to_dataset(&table)?;
    Ok((dataset, table.skipped_rows))
}

fn csv_error(path: &Path, error: &csv::Error) -> IngestError {
    IngestError::Csv {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_header_collapses_whitespace() {
        assert_eq!(normalize_header("\u{feff} First   Name "), "First Name");
    }
}
