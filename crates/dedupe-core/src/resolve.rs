//! Duplicate resolution.
//!
//! Records are grouped by their normalized key over the configured key
//! columns (every column when none are configured). Each group collapses to a
//! single output record:
//!
//! - `remove_duplicates` keeps the member with the smallest position.
//! - `merge_smart` builds one record whose cells are the first non-null raw
//!   value of each column, in ascending position order.
//!
//! Output records are ordered by the first position of their group, and
//! [`ResolutionOutcome::survivor_positions`] maps each output row back to the
//! original position it came from.
//!
//! Only records flagged by at least one detection method take part: a record
//! no requested method flagged passes through untouched even when it shares
//! a key with flagged records. Members of detected conflict groups are left
//! alone unless the conflict policy is `include`.

use std::collections::BTreeSet;

use tracing::{info, warn};

use dedupe_model::{
    Cell, ConflictPolicy, Dataset, DedupeOptions, MergeStrategy, Position, ResolutionOutcome,
};

use crate::columns::comparison_columns;
use crate::detect::DetectionReport;
use crate::error::{EngineError, Result};
use crate::normalize::normalize_columns;

/// First non-null raw value per column across `rows`, in the given order.
fn coalesce(dataset: &Dataset, rows: &[usize]) -> Vec<Cell> {
    (0..dataset.column_count())
        .map(|column| {
            rows.iter()
                .find_map(|&row| dataset.records[row].value(column).cloned().flatten())
        })
        .collect()
}

/// Split key groups so that only flagged, unprotected records collapse
/// together; every other record stands alone. Units are ordered by their
/// first position.
fn resolution_units(
    dataset: &Dataset,
    groups: Vec<Vec<usize>>,
    flagged: &BTreeSet<Position>,
    protected: &BTreeSet<Position>,
) -> Vec<Vec<usize>> {
    let mut units = Vec::with_capacity(groups.len());
    for group in groups {
        let (mergeable, kept_apart): (Vec<usize>, Vec<usize>) =
            group.into_iter().partition(|&row| {
                let position = dataset.records[row].position;
                flagged.contains(&position) && !protected.contains(&position)
            });
        units.extend(kept_apart.into_iter().map(|row| vec![row]));
        if !mergeable.is_empty() {
            units.push(mergeable);
        }
    }
    units.sort_by_key(|unit| dataset.records[unit[0]].position);
    units
}

/// Records sharing a key with others that no detection method flagged.
fn unflagged_key_mates(
    dataset: &Dataset,
    groups: &[Vec<usize>],
    flagged: &BTreeSet<Position>,
) -> usize {
    groups
        .iter()
        .filter(|group| group.len() > 1)
        .flatten()
        .filter(|&&row| !flagged.contains(&dataset.records[row].position))
        .count()
}

/// Collapse duplicate groups in `dataset` according to `options`.
///
/// # Errors
///
/// Fails when a record does not match the schema width.
pub fn resolve(
    dataset: &Dataset,
    detection: &DetectionReport,
    options: &DedupeOptions,
) -> Result<ResolutionOutcome> {
    let mut log = Vec::new();

    let selection = comparison_columns(&dataset.schema, &options.key_columns);
    if !selection.missing.is_empty() {
        log.push(format!(
            "Ignored {} key column(s) not present in the dataset",
            selection.missing.len()
        ));
    }
    let (columns, keyed) = if selection.is_empty() {
        log.push("No configured key column exists; comparing all columns".to_string());
        (dataset.schema.all_indices(), false)
    } else {
        (selection.indices, selection.from_keys)
    };

    let mut strategy = options.merge_strategy;
    if strategy == MergeStrategy::MergeSmart && !keyed {
        log.push(format!(
            "{} needs key columns; falling back to {}",
            MergeStrategy::MergeSmart,
            MergeStrategy::RemoveDuplicates
        ));
        info!("merge_smart without key columns, falling back to remove_duplicates");
        strategy = MergeStrategy::RemoveDuplicates;
    }
    if keyed {
        log.push(format!("Strategy {strategy} over {} key column(s)", columns.len()));
    } else {
        log.push(format!("Strategy {strategy} over all {} column(s)", columns.len()));
    }

    let conflict_positions = detection.conflict_positions();
    let protected = match options.conflict_policy {
        ConflictPolicy::Exclude => conflict_positions.clone(),
        ConflictPolicy::Include => BTreeSet::new(),
    };
    if !conflict_positions.is_empty() {
        match options.conflict_policy {
            ConflictPolicy::Exclude => log.push(format!(
                "Preserved {} conflicting group(s) covering {} record(s) for manual review",
                detection.conflicts.len(),
                conflict_positions.len()
            )),
            ConflictPolicy::Include => {
                warn!(
                    groups = detection.conflicts.len(),
                    records = conflict_positions.len(),
                    "conflicting records included in automatic resolution"
                );
                log.push(format!(
                    "Conflict policy include: {} conflicting group(s) covering {} record(s) resolved automatically",
                    detection.conflicts.len(),
                    conflict_positions.len()
                ));
            }
        }
    }

    let projection =
        normalize_columns(dataset, &columns, false).map_err(EngineError::Resolution)?;
    let groups = projection.groups();
    let unflagged = unflagged_key_mates(dataset, &groups, &detection.affected);
    if unflagged > 0 {
        log.push(format!(
            "Kept {unflagged} record(s) sharing a key with others because no requested method flagged them"
        ));
    }
    let units = resolution_units(dataset, groups, &detection.affected, &protected);

    let mut rows = Vec::with_capacity(units.len());
    let mut survivor_positions = Vec::with_capacity(units.len());
    let mut removed_or_merged_positions = BTreeSet::new();
    let mut collapsed_groups = 0usize;
    for unit in &units {
        let first = &dataset.records[unit[0]];
        survivor_positions.push(first.position);
        if unit.len() > 1 {
            collapsed_groups += 1;
            removed_or_merged_positions
                .extend(unit[1..].iter().map(|&row| dataset.records[row].position));
        }
        rows.push(match strategy {
            MergeStrategy::RemoveDuplicates => first.values.clone(),
            MergeStrategy::MergeSmart => coalesce(dataset, unit),
        });
    }
    let resolved_dataset = Dataset::from_rows(dataset.schema.clone(), rows)?;

    let collapsed = removed_or_merged_positions.len();
    if collapsed_groups == 0 {
        if protected.is_empty() {
            log.push("No duplicate groups found; dataset unchanged".to_string());
        } else {
            log.push("No non-conflicting duplicate groups to resolve".to_string());
        }
    } else {
        match strategy {
            MergeStrategy::RemoveDuplicates => log.push(format!(
                "Removed {collapsed} duplicate record(s) from {collapsed_groups} group(s), keeping the earliest record of each"
            )),
            MergeStrategy::MergeSmart => log.push(format!(
                "Merged {} record(s) from {collapsed_groups} group(s) into {collapsed_groups} record(s) using the first non-null value per column",
                collapsed + collapsed_groups
            )),
        }
    }
    log.push(format!(
        "Resolved dataset has {} of {} row(s); {} record(s) were flagged by detection",
        resolved_dataset.row_count(),
        dataset.row_count(),
        detection.total_duplicates()
    ));
    info!(
        %strategy,
        rows_in = dataset.row_count(),
        rows_out = resolved_dataset.row_count(),
        groups = collapsed_groups,
        "resolution finished"
    );

    Ok(ResolutionOutcome {
        strategy_used: strategy,
        resolved_dataset,
        human_log: log,
        removed_or_merged_positions,
        survivor_positions,
    })
}
