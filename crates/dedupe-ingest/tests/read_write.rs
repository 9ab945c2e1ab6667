use std::fs;
use std::path::PathBuf;

use dedupe_ingest::{
    DataFormat, IngestError, read_dataset, read_delimited_with_polars, write_dataset,
};
use dedupe_model::{ColumnType, Position, Value};
use tempfile::TempDir;

fn temp_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn reads_csv_with_types_and_skips_malformed_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(
        &dir,
        "customers.csv",
        "id,email,amount\n1,a@x.io,10.5\n2,b@x.io\n3,,7\n\n",
    );
    let loaded = read_dataset(&path).expect("read csv");
    assert_eq!(loaded.format, DataFormat::Csv);
    assert_eq!(loaded.skipped_rows, 1);
    let dataset = loaded.dataset;
    assert_eq!(dataset.row_count(), 2);
    let types: Vec<ColumnType> = dataset
        .schema
        .columns()
        .iter()
        .map(|column| column.column_type)
        .collect();
    assert_eq!(
        types,
        vec![ColumnType::Integer, ColumnType::String, ColumnType::Float]
    );
    assert_eq!(dataset.value(Position(1), "email"), Some(&None));
    assert_eq!(
        dataset.value(Position(1), "id"),
        Some(&Some(Value::Integer(3)))
    );
}

#[test]
fn reads_tsv() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "rows.tsv", "name\tcity\nAnn\tOslo\nBo\tRome\n");
    let loaded = read_dataset(&path).expect("read tsv");
    assert_eq!(loaded.format, DataFormat::Tsv);
    assert_eq!(loaded.dataset.row_count(), 2);
    assert_eq!(
        loaded.dataset.value(Position(0), "city"),
        Some(&Some(Value::from("Oslo")))
    );
}

#[test]
fn reads_json_array() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(
        &dir,
        "rows.json",
        r#"[{"id": 1, "active": true}, {"id": 2, "active": false}]"#,
    );
    let loaded = read_dataset(&path).expect("read json");
    assert_eq!(loaded.dataset.row_count(), 2);
    assert_eq!(
        loaded.dataset.schema.columns()[1].column_type,
        ColumnType::Boolean
    );
}

#[test]
fn rejects_unsupported_and_missing_inputs() {
    let dir = TempDir::new().expect("temp dir");
    let xlsx = temp_file(&dir, "book.xlsx", "binary");
    assert!(matches!(
        read_dataset(&xlsx),
        Err(IngestError::UnsupportedFormat { .. })
    ));
    let missing = dir.path().join("absent.csv");
    assert!(matches!(
        read_dataset(&missing),
        Err(IngestError::FileNotFound { .. })
    ));
}

#[test]
fn json_object_input_is_a_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "rows.json", r#"{"id": 1}"#);
    assert!(matches!(read_dataset(&path), Err(IngestError::Json { .. })));
}

#[test]
fn writes_csv_preserving_columns_and_nulls() {
    let dir = TempDir::new().expect("temp dir");
    let input = temp_file(&dir, "in.csv", "id,name,score\n1,Ann,2.5\n2,,3\n");
    let dataset = read_dataset(&input).expect("read").dataset;
    let output = dir.path().join("out.csv");
    write_dataset(&dataset, &output, DataFormat::Csv).expect("write");
    let written = fs::read_to_string(&output).expect("read back");
    assert_eq!(written, "id,name,score\n1,Ann,2.5\n2,,3\n");
}

#[test]
fn writes_json_objects_in_column_order() {
    let dir = TempDir::new().expect("temp dir");
    let input = temp_file(&dir, "in.csv", "zeta,alpha\n1,x\n");
    let dataset = read_dataset(&input).expect("read").dataset;
    let output = dir.path().join("out.json");
    write_dataset(&dataset, &output, DataFormat::Json).expect("write");
    let written = fs::read_to_string(&output).expect("read back");
    let zeta = written.find("zeta").expect("zeta key");
    let alpha = written.find("alpha").expect("alpha key");
    assert!(zeta < alpha);
}

#[test]
fn polars_reader_matches_csv_reader() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(
        &dir,
        "big.csv",
        "id,email,joined\n1,a@x.io,2024-01-01\n2,B@x.io,2024-02-01\n",
    );
    let via_polars = read_delimited_with_polars(&path, b',').expect("polars read");
    let via_csv = read_dataset(&path).expect("csv read").dataset;
    assert_eq!(via_polars.schema, via_csv.schema);
    assert_eq!(via_polars.records, via_csv.records);
}

#[test]
fn polars_reader_keeps_late_text_values() {
    let dir = TempDir::new().expect("temp dir");
    let mut contents = String::from("id,amount\n");
    for n in 0..200 {
        let amount = if n == 150 { "N/A".to_string() } else { n.to_string() };
        contents.push_str(&format!("{n},{amount}\n"));
    }
    let path = temp_file(&dir, "late.csv", &contents);

    let via_polars = read_delimited_with_polars(&path, b',').expect("polars read");
    let via_csv = read_dataset(&path).expect("csv read").dataset;
    assert_eq!(via_polars.schema, via_csv.schema);
    assert_eq!(via_polars.records, via_csv.records);
    assert_eq!(via_polars.records[150].values[1], Some(Value::from("N/A")));
    assert_eq!(via_polars.records[0].values[0], Some(Value::Integer(0)));
}
