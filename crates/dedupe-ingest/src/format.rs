use std::fmt;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Serialization used for both the input and the resolved output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Tsv,
    Json,
}

impl DataFormat {
    /// Pick the format from a file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(DataFormat::Csv),
            "tsv" | "tab" => Ok(DataFormat::Tsv),
            "json" => Ok(DataFormat::Json),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    pub fn delimiter(self) -> Option<u8> {
        match self {
            DataFormat::Csv => Some(b','),
            DataFormat::Tsv => Some(b'\t'),
            DataFormat::Json => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Tsv => "tsv",
            DataFormat::Json => "json",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_supported_extensions() {
        assert_eq!(
            DataFormat::from_path(Path::new("a/b.CSV")).unwrap(),
            DataFormat::Csv
        );
        assert_eq!(
            DataFormat::from_path(Path::new("b.tsv")).unwrap(),
            DataFormat::Tsv
        );
        assert_eq!(
            DataFormat::from_path(Path::new("b.json")).unwrap(),
            DataFormat::Json
        );
    }

    #[test]
    fn rejects_spreadsheets() {
        let err = DataFormat::from_path(Path::new("book.xlsx")).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnsupportedFormat { ref extension, .. } if extension == "xlsx"
        ));
    }
}
