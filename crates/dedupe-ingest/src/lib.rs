pub mod csv_reader;
pub mod error;
pub mod format;
pub mod infer;
pub mod json_reader;
pub mod polars_reader;
pub mod reader;
pub mod writer;

pub use csv_reader::{RawTable, raw_table_to_dataset, read_delimited, read_raw_table};
pub use error::{IngestError, Result};
pub use format::DataFormat;
pub use infer::{infer_column_type, parse_cell, parse_timestamp};
pub use json_reader::read_json;
pub use polars_reader::{
    DEFAULT_STREAMING_THRESHOLD_BYTES, frame_to_dataset, read_delimited_with_polars, read_frame,
    should_use_streaming, should_use_streaming_with_threshold,
};
pub use reader::{LoadedDataset, read_dataset};
pub use writer::{dataset_to_json, write_dataset, write_delimited, write_json};
