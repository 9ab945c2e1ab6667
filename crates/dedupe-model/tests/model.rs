use dedupe_model::{
    Column, ColumnType, ConflictPolicy, Dataset, DedupeOptions, DetectionMethod, MergeStrategy,
    NullHandling, Position, Schema, Value,
};

fn customers() -> Dataset {
    let schema = Schema::new(vec![
        Column::new("id", ColumnType::Integer),
        Column::new("email", ColumnType::String),
    ]);
    Dataset::from_rows(
        schema,
        vec![
            vec![Some(Value::Integer(1)), Some(Value::from("a@x.io"))],
            vec![Some(Value::Integer(2)), None],
        ],
    )
    .expect("dataset")
}

#[test]
fn dataset_lookup_by_position_and_column() {
    let dataset = customers();
    assert_eq!(dataset.row_count(), 2);
    assert_eq!(dataset.column_count(), 2);
    assert_eq!(
        dataset.value(Position(0), "email"),
        Some(&Some(Value::from("a@x.io")))
    );
    assert_eq!(dataset.value(Position(0), "missing"), None);
    assert!(dataset.record(Position(9)).is_none());
}

#[test]
fn options_accept_every_external_name() {
    let options: DedupeOptions = toml::from_str(
        r#"
        detection_types = ["exact", "case_variations", "email_case", "conflicting"]
        merge_strategy = "remove_duplicates"
        null_handling = "match_nulls"
        conflict_resolution = "manual review"
        conflict_policy = "include"
        "#,
    )
    .expect("parse options");
    assert_eq!(options.detection_types, DetectionMethod::ALL.to_vec());
    assert_eq!(options.merge_strategy, MergeStrategy::RemoveDuplicates);
    assert_eq!(options.null_handling, NullHandling::MatchNulls);
    assert_eq!(options.conflict_resolution.as_deref(), Some("manual review"));
    assert_eq!(options.conflict_policy, ConflictPolicy::Include);
}

#[test]
fn options_reject_unknown_method_names() {
    let parsed: Result<DedupeOptions, _> = toml::from_str(r#"detection_types = ["fuzzy"]"#);
    assert!(parsed.is_err());
}
