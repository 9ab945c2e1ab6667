use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use dedupe_cli::config::load_options;
use dedupe_cli::pipeline::{PipelineRequest, default_output_path, failure_response, run_pipeline};
use dedupe_ingest::DataFormat;
use dedupe_model::{DedupeOptions, ErrorKind, MergeStrategy, ResponseStatus};

const CUSTOMERS: &str = "\
id,email,plan,amount
1,john@Example.com,basic,10
2,mary@example.com,pro,
1,JOHN@example.com,basic,10
2,mary@example.com,basic,25
";

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write input");
    path
}

#[test]
fn writes_deduplicated_csv_next_to_input() {
    let dir = TempDir::new().expect("temp dir");
    let input = write(&dir, "customers.csv", CUSTOMERS);
    let mut request = PipelineRequest::new(&input, DedupeOptions::default());
    request.report = Some(dir.path().join("report.json"));

    let result = run_pipeline(&request).expect("pipeline");
    let output = default_output_path(&input, DataFormat::Csv);
    assert_eq!(result.output_path.as_deref(), Some(output.as_path()));
    assert_eq!(result.rows_in(), 4);
    // Rows 0 and 2 differ only by email case.
    assert_eq!(result.rows_out(), 3);

    let written = fs::read_to_string(&output).expect("output");
    assert_eq!(
        written,
        "id,email,plan,amount\n1,john@Example.com,basic,10\n2,mary@example.com,pro,\n2,mary@example.com,basic,25\n"
    );

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).expect("report"))
            .expect("report json");
    assert_eq!(report["total_duplicates"], 2);
    assert_eq!(report["rows_out"], 3);

    let response = result.response(7);
    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.total_duplicates, 2);
}

#[test]
fn key_conflicts_survive_merge() {
    let dir = TempDir::new().expect("temp dir");
    let input = write(&dir, "customers.csv", CUSTOMERS);
    let config = write(
        &dir,
        "dedupe.toml",
        r#"
        key_columns = ["email"]
        merge_strategy = "merge_smart"
        "#,
    );
    let options = load_options(Some(&config)).expect("options");
    assert_eq!(options.merge_strategy, MergeStrategy::MergeSmart);

    let mut request = PipelineRequest::new(&input, options);
    request.output = Some(dir.path().join("out.json"));
    let result = run_pipeline(&request).expect("pipeline");

    assert_eq!(result.run.detection.conflicts.len(), 1);
    // john merges; mary disagrees on plan and stays as two rows.
    assert_eq!(result.rows_out(), 3);
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out.json")).expect("output"))
            .expect("json");
    assert_eq!(json.as_array().map(Vec::len), Some(3));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let input = write(&dir, "customers.csv", CUSTOMERS);
    let mut request = PipelineRequest::new(&input, DedupeOptions::default());
    request.dry_run = true;
    request.report = Some(dir.path().join("report.json"));

    let result = run_pipeline(&request).expect("pipeline");
    assert!(result.output_path.is_none());
    assert!(result.message().starts_with("Would remove 1 of 4 row(s)"));
    let entries = fs::read_dir(dir.path()).expect("read dir").count();
    assert_eq!(entries, 1);
}

#[test]
fn failures_become_tagged_responses() {
    let dir = TempDir::new().expect("temp dir");

    let unsupported = write(&dir, "book.xlsx", "binary");
    let error = run_pipeline(&PipelineRequest::new(&unsupported, DedupeOptions::default()))
        .expect_err("unsupported");
    let response = failure_response(&error, 1);
    assert_eq!(response.status, ResponseStatus::Error);
    assert_eq!(response.error_kind, Some(ErrorKind::UnsupportedInputFormat));

    let empty = write(&dir, "empty.csv", "id,name\n");
    let error = run_pipeline(&PipelineRequest::new(&empty, DedupeOptions::default()))
        .expect_err("empty");
    assert_eq!(
        failure_response(&error, 1).error_kind,
        Some(ErrorKind::EmptyDataset)
    );

    let mut bad_output = PipelineRequest::new(
        write(&dir, "ok.csv", CUSTOMERS),
        DedupeOptions::default(),
    );
    bad_output.output = Some(dir.path().join("out.parquet"));
    let error = run_pipeline(&bad_output).expect_err("bad output");
    assert_eq!(
        failure_response(&error, 1).error_kind,
        Some(ErrorKind::UnsupportedInputFormat)
    );
    assert!(!dir.path().join("out.parquet").exists());
}

#[test]
fn bad_config_is_invalid_config() {
    let dir = TempDir::new().expect("temp dir");
    let config = write(&dir, "dedupe.toml", "merge_strategy = \"shuffle\"\n");
    let error = anyhow::Error::from(load_options(Some(&config)).expect_err("invalid"));
    let response = failure_response(&error, 0);
    assert_eq!(response.error_kind, Some(ErrorKind::InvalidConfig));
    insta::assert_snapshot!(
        serde_json::to_value(&response).expect("json")["status"],
        @r#""error""#
    );
}
