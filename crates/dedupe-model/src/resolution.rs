use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Position};

/// How detected duplicates are turned into a new dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Keep the earliest record of each normalized key, drop the rest.
    #[default]
    RemoveDuplicates,
    /// Coalesce each key group into one record, first non-null value per column.
    MergeSmart,
}

impl MergeStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MergeStrategy::RemoveDuplicates => "remove_duplicates",
            MergeStrategy::MergeSmart => "merge_smart",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "remove_duplicates" | "remove" => Ok(MergeStrategy::RemoveDuplicates),
            "merge_smart" | "merge" => Ok(MergeStrategy::MergeSmart),
            other => Err(format!("unknown merge strategy: {other}")),
        }
    }
}

/// The resolver's product.
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    /// Strategy actually applied (merge-smart may fall back).
    pub strategy_used: MergeStrategy,
    /// New dataset with contiguous positions `0..n`.
    pub resolved_dataset: Dataset,
    /// Human-readable action summaries, counts only.
    pub human_log: Vec<String>,
    /// Original positions that were dropped or folded into a survivor.
    pub removed_or_merged_positions: BTreeSet<Position>,
    /// Original position backing each output row, indexed by new position.
    pub survivor_positions: Vec<Position>,
}

impl ResolutionOutcome {
    pub fn removed_count(&self) -> usize {
        self.removed_or_merged_positions.len()
    }

    /// Original position of an output row.
    pub fn origin_of(&self, resolved: Position) -> Option<Position> {
        self.survivor_positions.get(resolved.index()).copied()
    }
}
