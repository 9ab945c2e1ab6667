//! End-to-end deduplication of one dataset.

use tracing::{debug, info, info_span};

use dedupe_model::{Dataset, DedupeError, DedupeOptions, NullHandling, ResolutionOutcome};

use crate::classify::classify_email_columns;
use crate::detect::{DetectionContext, DetectionReport, DetectorRegistry, default_registry};
use crate::error::Result;
use crate::resolve::resolve;
use crate::score::{ImpactScore, score_impact};

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct DedupeRun {
    /// Columns treated as email columns.
    pub classification: Vec<String>,
    pub detection: DetectionReport,
    pub resolution: ResolutionOutcome,
    pub score: ImpactScore,
}

impl DedupeRun {
    pub fn total_duplicates(&self) -> usize {
        self.detection.total_duplicates()
    }
}

/// Runs classification, detection, resolution and scoring in sequence.
///
/// The engine holds no state between runs and never modifies the input.
pub struct DedupeEngine<'a> {
    options: &'a DedupeOptions,
    registry: &'a DetectorRegistry,
}

impl<'a> DedupeEngine<'a> {
    pub fn new(options: &'a DedupeOptions) -> Self {
        Self {
            options,
            registry: default_registry(),
        }
    }

    /// Use a custom set of detectors.
    pub fn with_registry(mut self, registry: &'a DetectorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn options(&self) -> &DedupeOptions {
        self.options
    }

    /// Deduplicate `dataset`.
    ///
    /// # Errors
    ///
    /// Fails on invalid options, an empty dataset, or records that do not
    /// match the schema. Individual detection methods failing is not an
    /// error; see [`DetectionReport::failures`].
    pub fn run(&self, dataset: &Dataset) -> Result<DedupeRun> {
        let options = self.options;
        options.validate()?;
        if dataset.is_empty() {
            return Err(DedupeError::EmptyDataset.into());
        }
        if options.null_handling != NullHandling::default() {
            debug!(
                null_handling = ?options.null_handling,
                "null handling option is not applied; nulls compare equal to nulls"
            );
        }

        let classification = {
            let _span = info_span!("classify").entered();
            let columns = classify_email_columns(dataset, &options.email_columns);
            debug!(email_columns = ?columns, "classified columns");
            columns
        };

        let detection = {
            let _span = info_span!("detection", methods = options.detection_types.len()).entered();
            let context = DetectionContext {
                dataset,
                key_columns: &options.key_columns,
                email_columns: &classification,
            };
            let report = self.registry.run(&context, &options.detection_types);
            info!(
                total_duplicates = report.total_duplicates(),
                conflicts = report.conflicts.len(),
                failures = report.failures.len(),
                "detection finished"
            );
            report
        };

        let resolution = {
            let _span = info_span!("resolution", strategy = %options.merge_strategy).entered();
            resolve(dataset, &detection, options)?
        };

        let score = {
            let _span = info_span!("scoring").entered();
            let score = score_impact(
                dataset,
                &resolution.resolved_dataset,
                detection.total_duplicates(),
                &options.scoring,
            );
            info!(overall = score.overall, label = %score.label, "scored resolution");
            score
        };

        Ok(DedupeRun {
            classification,
            detection,
            resolution,
            score,
        })
    }
}
