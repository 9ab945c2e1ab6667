//! Detection vocabulary: methods, findings and conflict groups.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::Position;
use crate::value::Cell;

/// A strategy for deciding that two records are "the same".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DetectionMethod {
    /// Every raw value of the row matches.
    #[serde(rename = "exact")]
    Exact,
    /// Case-folded, trimmed comparison over the key columns (or all columns).
    #[serde(rename = "case_variations")]
    CaseInsensitive,
    /// Case-insensitive comparison that only runs when an email column is in
    /// the comparison set.
    #[serde(rename = "email_case")]
    EmailNormalized,
    /// Records share a normalized key but disagree on another column.
    #[serde(rename = "conflicting")]
    KeyConflict,
}

impl DetectionMethod {
    pub const ALL: [DetectionMethod; 4] = [
        DetectionMethod::Exact,
        DetectionMethod::CaseInsensitive,
        DetectionMethod::EmailNormalized,
        DetectionMethod::KeyConflict,
    ];

    /// External configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            DetectionMethod::Exact => "exact",
            DetectionMethod::CaseInsensitive => "case_variations",
            DetectionMethod::EmailNormalized => "email_case",
            DetectionMethod::KeyConflict => "conflicting",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DetectionMethod::Exact => "Byte-for-byte identical rows",
            DetectionMethod::CaseInsensitive => {
                "Rows equal after case folding and trimming text"
            }
            DetectionMethod::EmailNormalized => {
                "Rows equal after normalizing email columns (needs an email column)"
            }
            DetectionMethod::KeyConflict => {
                "Rows sharing a key whose other columns disagree (needs key columns)"
            }
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMethod {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "exact" => Ok(DetectionMethod::Exact),
            "case_variations" | "case" | "case_insensitive" => {
                Ok(DetectionMethod::CaseInsensitive)
            }
            "email_case" | "email" | "email_normalized" => Ok(DetectionMethod::EmailNormalized),
            "conflicting" | "conflict" | "key_conflict" => Ok(DetectionMethod::KeyConflict),
            other => Err(format!("unknown detection method: {other}")),
        }
    }
}

/// Result of running one detection method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub method: DetectionMethod,
    pub affected_positions: BTreeSet<Position>,
    pub count: usize,
    pub percentage_of_dataset: f64,
}

impl Finding {
    pub fn new(
        method: DetectionMethod,
        affected_positions: BTreeSet<Position>,
        row_count: usize,
    ) -> Self {
        let count = affected_positions.len();
        Self {
            method,
            affected_positions,
            count,
            percentage_of_dataset: percentage(count, row_count),
        }
    }

    pub fn empty(method: DetectionMethod) -> Self {
        Self {
            method,
            affected_positions: BTreeSet::new(),
            count: 0,
            percentage_of_dataset: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.affected_positions.is_empty()
    }
}

/// Records sharing one normalized key whose other columns disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictGroup {
    pub normalized_key: Vec<Cell>,
    pub member_positions: BTreeSet<Position>,
    pub diverging_columns: BTreeSet<String>,
}

impl ConflictGroup {
    pub fn contains(&self, position: Position) -> bool {
        self.member_positions.contains(&position)
    }

    pub fn first_position(&self) -> Option<Position> {
        self.member_positions.first().copied()
    }
}

/// `count / total × 100`, or 0 for an empty total.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
