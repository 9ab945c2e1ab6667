//! Column type inference for text-based inputs.
//!
//! A column takes the narrowest type every non-null value parses as, tried in
//! the order integer, float, boolean, timestamp, string. Empty or
//! whitespace-only cells are null and do not vote.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use dedupe_model::{Cell, ColumnType, Value};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// True when the raw cell is treated as null.
pub fn is_null_cell(raw: &str) -> bool {
    raw.trim().is_empty()
}

pub fn parse_i64(value: &str) -> Option<i64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<i64>().ok()
}

pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Infer the type of a column from its raw cells.
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = Option<&'a str>> + Clone) -> ColumnType {
    let non_null = || {
        values
            .clone()
            .into_iter()
            .flatten()
            .filter(|raw| !is_null_cell(raw))
    };
    if non_null().next().is_none() {
        return ColumnType::Null;
    }
    if non_null().all(|raw| parse_i64(raw).is_some()) {
        ColumnType::Integer
    } else if non_null().all(|raw| parse_f64(raw).is_some()) {
        ColumnType::Float
    } else if non_null().all(|raw| parse_bool(raw).is_some()) {
        ColumnType::Boolean
    } else if non_null().all(|raw| parse_timestamp(raw).is_some()) {
        ColumnType::Timestamp
    } else {
        ColumnType::String
    }
}

/// Convert a raw cell into a typed value for a column of `column_type`.
///
/// Text cells are kept verbatim (no trimming) so whitespace variants stay
/// visible to the detector.
pub fn parse_cell(raw: &str, column_type: ColumnType) -> Cell {
    if is_null_cell(raw) {
        return None;
    }
    let parsed = match column_type {
        ColumnType::Integer => parse_i64(raw).map(Value::Integer),
        ColumnType::Float => parse_f64(raw).map(Value::Float),
        ColumnType::Boolean => parse_bool(raw).map(Value::Boolean),
        ColumnType::Timestamp => parse_timestamp(raw).map(Value::Timestamp),
        ColumnType::String | ColumnType::Null => None,
    };
    Some(parsed.unwrap_or_else(|| Value::Text(raw.to_string())))
}
