//! Impact scoring of a resolution.

use std::fmt;

use serde::Serialize;

use dedupe_model::{Dataset, ScoringOptions, percentage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLabel {
    Excellent,
    Good,
    NeedsImprovement,
}

impl QualityLabel {
    pub fn from_score(overall: f64, scoring: &ScoringOptions) -> Self {
        if overall >= scoring.excellent_threshold {
            QualityLabel::Excellent
        } else if overall >= scoring.good_threshold {
            QualityLabel::Good
        } else {
            QualityLabel::NeedsImprovement
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityLabel::Excellent => "excellent",
            QualityLabel::Good => "good",
            QualityLabel::NeedsImprovement => "needs_improvement",
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-scores and overall score, each within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactScore {
    pub overall: f64,
    pub label: QualityLabel,
    pub dedup_reduction_rate: f64,
    pub data_retention_rate: f64,
    pub column_retention_rate: f64,
}

/// Share of flagged duplicates that the resolution eliminated.
pub fn dedup_reduction_rate(total_duplicates: usize, rows_removed: usize) -> f64 {
    if total_duplicates == 0 {
        return 100.0;
    }
    let remaining = total_duplicates.saturating_sub(rows_removed);
    let eliminated = total_duplicates - remaining;
    percentage(eliminated, total_duplicates).clamp(0.0, 100.0)
}

fn retention_rate(kept: usize, original: usize) -> f64 {
    if original == 0 {
        100.0
    } else {
        percentage(kept, original).clamp(0.0, 100.0)
    }
}

/// Score how a resolution changed `original` into `resolved`.
///
/// The overall score is the weighted mean of the three sub-scores, so it
/// stays on the same 0-100 scale whatever the weights sum to.
pub fn score_impact(
    original: &Dataset,
    resolved: &Dataset,
    total_duplicates: usize,
    scoring: &ScoringOptions,
) -> ImpactScore {
    let rows_removed = original.row_count().saturating_sub(resolved.row_count());
    let dedup_reduction_rate = dedup_reduction_rate(total_duplicates, rows_removed);
    let data_retention_rate = retention_rate(resolved.row_count(), original.row_count());
    let column_retention_rate = retention_rate(resolved.column_count(), original.column_count());

    let rates = [dedup_reduction_rate, data_retention_rate, column_retention_rate];
    let weights = scoring.weights();
    let weight_sum: f64 = weights.iter().sum();
    let overall = if weight_sum > 0.0 {
        rates.iter().zip(weights).map(|(rate, weight)| rate * weight).sum::<f64>() / weight_sum
    } else {
        rates.iter().sum::<f64>() / rates.len() as f64
    };

    ImpactScore {
        overall,
        label: QualityLabel::from_score(overall, scoring),
        dedup_reduction_rate,
        data_retention_rate,
        column_retention_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedupe_model::{Column, ColumnType, Schema, Value};

    fn rows(n: i64) -> Dataset {
        Dataset::from_rows(
            Schema::new(vec![Column::new("n", ColumnType::Integer)]),
            (0..n).map(|i| vec![Some(Value::Integer(i))]).collect(),
        )
        .expect("dataset")
    }

    #[test]
    fn untouched_dataset_scores_100() {
        let data = rows(4);
        let score = score_impact(&data, &data, 0, &ScoringOptions::default());
        assert!((score.overall - 100.0).abs() < 1e-9);
        assert_eq!(score.label, QualityLabel::Excellent);
    }

    #[test]
    fn weighted_mean_of_sub_scores() {
        let score = score_impact(&rows(10), &rows(8), 4, &ScoringOptions::default());
        assert!((score.dedup_reduction_rate - 50.0).abs() < 1e-9);
        assert!((score.data_retention_rate - 80.0).abs() < 1e-9);
        assert!((score.column_retention_rate - 100.0).abs() < 1e-9);
        // 0.5 * 50 + 0.3 * 80 + 0.2 * 100
        assert!((score.overall - 69.0).abs() < 1e-9);
        assert_eq!(score.label, QualityLabel::NeedsImprovement);
    }

    #[test]
    fn removing_more_than_flagged_caps_at_100() {
        assert!((dedup_reduction_rate(2, 5) - 100.0).abs() < 1e-9);
        assert!((dedup_reduction_rate(0, 5) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_weights_fall_back_to_plain_mean() {
        let scoring = ScoringOptions {
            dedup_reduction_weight: 0.0,
            data_retention_weight: 0.0,
            column_retention_weight: 0.0,
            ..ScoringOptions::default()
        };
        let score = score_impact(&rows(10), &rows(8), 4, &scoring);
        assert!((score.overall - (50.0 + 80.0 + 100.0) / 3.0).abs() < 1e-9);
        assert_eq!(score.label, QualityLabel::Good);
    }

    #[test]
    fn labels_follow_thresholds() {
        let scoring = ScoringOptions::default();
        assert_eq!(QualityLabel::from_score(85.0, &scoring), QualityLabel::Excellent);
        assert_eq!(QualityLabel::from_score(70.0, &scoring), QualityLabel::Good);
        assert_eq!(
            QualityLabel::from_score(69.9, &scoring),
            QualityLabel::NeedsImprovement
        );
    }
}
