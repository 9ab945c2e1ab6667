use std::path::Path;

use tracing::{debug, info};

use dedupe_model::Dataset;

use crate::csv_reader::read_delimited;
use crate::error::{IngestError, Result};
use crate::format::DataFormat;
use crate::json_reader::read_json;
use crate::polars_reader::{read_delimited_with_polars, should_use_streaming};

/// A dataset together with what the reader had to drop.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub format: DataFormat,
    /// Malformed rows skipped by the reader.
    pub skipped_rows: usize,
}

/// Read a dataset, picking the reader from the file extension.
///
/// Large delimited files go through Polars; smaller ones through the `csv`
/// crate so malformed rows can be skipped individually.
///
/// # Errors
///
/// Fails for unsupported extensions, missing files, and unreadable input.
/// Individual malformed rows are not errors.
pub fn read_dataset(path: &Path) -> Result<LoadedDataset> {
    let format = DataFormat::from_path(path)?;
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let (dataset, skipped_rows) = match format {
        DataFormat::Json => read_json(path)?,
        DataFormat::Csv | DataFormat::Tsv => {
            let delimiter = format.delimiter().unwrap_or(b',');
            if should_use_streaming(path) {
                debug!(path = %path.display(), "Using Polars for large file");
                (read_delimited_with_polars(path, delimiter)?, 0)
            } else {
                read_delimited(path, delimiter)?
            }
        }
    };
    info!(
        path = %path.display(),
        %format,
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        skipped_rows,
        "loaded dataset"
    );
    Ok(LoadedDataset {
        dataset,
        format,
        skipped_rows,
    })
}
