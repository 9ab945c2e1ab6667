//! Scalar cell values.
//!
//! Cells are `Option<Value>`; `None` is a null. `Value` carries a total order
//! and a hash so whole rows (or key tuples) can be used as grouping keys.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

/// A single non-null cell value.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Text(String),
}

/// A nullable cell.
pub type Cell = Option<Value>;

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Boolean(_) => 0,
            Value::Integer(_) => 1,
            Value::Float(_) => 2,
            Value::Timestamp(_) => 3,
            Value::Text(_) => 4,
        }
    }

    /// Returns the text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Comparison-only form: text is case-folded and trimmed, everything else
    /// is returned unchanged.
    #[must_use]
    pub fn normalized(&self) -> Value {
        match self {
            Value::Text(text) => Value::Text(text.trim().to_lowercase()),
            other => other.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Boolean(v) => v.hash(state),
            Value::Integer(v) => v.hash(state),
            // total_cmp equality is bit equality, so hashing the bits agrees with Eq.
            Value::Float(v) => v.to_bits().hash(state),
            Value::Timestamp(v) => v.hash(state),
            Value::Text(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => f.write_str(&format_numeric(*v)),
            Value::Timestamp(v) => {
                if v.num_seconds_from_midnight() == 0 && v.nanosecond() == 0 {
                    write!(f, "{}", v.format("%Y-%m-%d"))
                } else if v.nanosecond() == 0 {
                    write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S"))
                } else {
                    write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f"))
                }
            }
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

/// Formats a float without a trailing `.0` for whole numbers.
pub fn format_numeric(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn normalized_folds_case_and_trims_text_only() {
        assert_eq!(
            Value::from("  John@Example.COM ").normalized(),
            Value::from("john@example.com")
        );
        assert_eq!(Value::Integer(7).normalized(), Value::Integer(7));
    }

    #[test]
    fn floats_hash_consistently_with_eq() {
        let mut set = HashSet::new();
        set.insert(Value::Float(1.5));
        assert!(set.contains(&Value::Float(1.5)));
        assert!(!set.contains(&Value::Float(2.5)));
    }

    #[test]
    fn values_of_different_kinds_are_never_equal() {
        assert_ne!(Value::Integer(1), Value::Float(1.0));
        assert_ne!(Value::from("1"), Value::Integer(1));
    }

    #[test]
    fn display_keeps_whole_floats_compact() {
        assert_eq!(Value::Float(3.0).to_string(), "3");
        assert_eq!(Value::Float(2.25).to_string(), "2.25");
    }
}
