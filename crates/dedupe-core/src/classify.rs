//! Email column classification.
//!
//! A column counts as an email column when the caller names it, when its name
//! mentions mail, or when most of a small sample of its values look like
//! `local@domain.tld`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use dedupe_model::{Dataset, Value};

/// Values inspected per column when sniffing content.
pub const EMAIL_SAMPLE_SIZE: usize = 20;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
        .expect("Invalid email regex")
});

pub fn looks_like_email(raw: &str) -> bool {
    EMAIL_PATTERN.is_match(raw.trim())
}

fn name_suggests_email(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("email") || lower.contains("mail")
}

/// Share of sampled values that look like emails, or `None` when the column
/// has no non-null text in the sample window.
fn sampled_email_ratio(dataset: &Dataset, column: usize) -> Option<f64> {
    let sample: Vec<&str> = dataset
        .records
        .iter()
        .filter_map(|record| match record.value(column) {
            Some(Some(Value::Text(text))) => Some(text.as_str()),
            _ => None,
        })
        .take(EMAIL_SAMPLE_SIZE)
        .collect();
    if sample.is_empty() {
        return None;
    }
    let matches = sample.iter().filter(|value| looks_like_email(value)).count();
    Some(matches as f64 / sample.len() as f64)
}

/// Decide which columns hold email addresses.
///
/// A non-empty `configured` list is returned unchanged. Otherwise text
/// columns are selected by name first, then by content, in schema order.
pub fn classify_email_columns(dataset: &Dataset, configured: &[String]) -> Vec<String> {
    if !configured.is_empty() {
        return configured.to_vec();
    }
    let mut email_columns = Vec::new();
    for (idx, column) in dataset.schema.columns().iter().enumerate() {
        if !column.column_type.is_text() {
            continue;
        }
        if name_suggests_email(&column.name) {
            debug!(column = %column.name, "email column by name");
            email_columns.push(column.name.clone());
            continue;
        }
        if let Some(ratio) = sampled_email_ratio(dataset, idx)
            && ratio > 0.5
        {
            debug!(column = %column.name, ratio, "email column by content");
            email_columns.push(column.name.clone());
        }
    }
    email_columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedupe_model::{Column, ColumnType, Schema};

    fn dataset(columns: Vec<Column>, rows: Vec<Vec<Option<Value>>>) -> Dataset {
        Dataset::from_rows(Schema::new(columns), rows).expect("dataset")
    }

    #[test]
    fn configured_columns_win() {
        let data = dataset(vec![Column::new("contact", ColumnType::String)], vec![]);
        let configured = vec!["whatever".to_string()];
        assert_eq!(classify_email_columns(&data, &configured), configured);
    }

    #[test]
    fn picks_columns_by_name_and_content() {
        let data = dataset(
            vec![
                Column::new("E_Mail", ColumnType::String),
                Column::new("contact", ColumnType::String),
                Column::new("name", ColumnType::String),
                Column::new("mail_count", ColumnType::Integer),
            ],
            vec![
                vec![
                    None,
                    Some(Value::from("a@x.io")),
                    Some(Value::from("Ann")),
                    Some(Value::Integer(1)),
                ],
                vec![
                    None,
                    Some(Value::from("b@y.org")),
                    Some(Value::from("bo@home")),
                    Some(Value::Integer(2)),
                ],
            ],
        );
        assert_eq!(
            classify_email_columns(&data, &[]),
            vec!["E_Mail".to_string(), "contact".to_string()]
        );
    }

    #[test]
    fn exactly_half_is_not_enough() {
        let data = dataset(
            vec![Column::new("contact", ColumnType::String)],
            vec![
                vec![Some(Value::from("a@x.io"))],
                vec![Some(Value::from("not an address"))],
            ],
        );
        assert!(classify_email_columns(&data, &[]).is_empty());
    }

    #[test]
    fn email_pattern() {
        assert!(looks_like_email(" john@Example.com "));
        assert!(!looks_like_email("john@example"));
        assert!(!looks_like_email("@example.com"));
    }
}
