//! Deduplication pipeline with explicit stages.
//!
//! 1. **Ingest**: read the input file into a dataset
//! 2. **Deduplicate**: classify, detect, resolve and score
//! 3. **Output**: write the resolved dataset and the JSON report
//!
//! Output paths are checked before anything is written, and nothing is
//! written on a dry run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use dedupe_core::{DedupeEngine, DedupeRun, DetectionError, EngineError};
use dedupe_ingest::{DataFormat, IngestError, LoadedDataset, read_dataset, write_dataset};
use dedupe_model::{DedupeError, DedupeOptions, DedupeResponse, ErrorKind};
use dedupe_report::{DedupeReport, ReportError, write_report_json};

/// Everything needed for one run.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub input: PathBuf,
    /// Resolved dataset destination; derived from `input` when absent.
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub options: DedupeOptions,
    pub dry_run: bool,
}

impl PipelineRequest {
    pub fn new(input: impl Into<PathBuf>, options: DedupeOptions) -> Self {
        Self {
            input: input.into(),
            output: None,
            report: None,
            options,
            dry_run: false,
        }
    }
}

#[derive(Debug)]
pub struct PipelineResult {
    pub input: PathBuf,
    pub format: DataFormat,
    /// Malformed input rows the reader dropped.
    pub skipped_rows: usize,
    pub run: DedupeRun,
    pub report: DedupeReport,
    pub output_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub dry_run: bool,
}

impl PipelineResult {
    pub fn rows_in(&self) -> usize {
        self.run.detection.row_count
    }

    pub fn rows_out(&self) -> usize {
        self.run.resolution.resolved_dataset.row_count()
    }

    /// One-line outcome for the response envelope.
    pub fn message(&self) -> String {
        let removed = self.rows_in() - self.rows_out();
        let verb = if self.dry_run { "Would remove" } else { "Removed" };
        format!(
            "{verb} {removed} of {} row(s); {} flagged as duplicates, {} conflict group(s)",
            self.rows_in(),
            self.run.total_duplicates(),
            self.run.detection.conflicts.len()
        )
    }

    pub fn response(&self, elapsed_ms: u128) -> DedupeResponse {
        DedupeResponse::success(
            self.message(),
            elapsed_ms,
            self.rows_in(),
            self.rows_out(),
            self.run.total_duplicates(),
        )
        .with_output_path(self.output_path.clone())
        .with_report_path(self.report_path.clone())
    }
}

/// `<dir>/<stem>_deduped.<ext>` next to the input.
pub fn default_output_path(input: &Path, format: DataFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    input.with_file_name(format!("{stem}_deduped.{}", format.extension()))
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

pub fn ingest(input: &Path) -> Result<LoadedDataset> {
    let _span = info_span!("ingest", path = %input.display()).entered();
    read_dataset(input).with_context(|| format!("read {}", input.display()))
}

// ============================================================================
// Stage 2: Deduplicate
// ============================================================================

pub fn deduplicate(loaded: &LoadedDataset, options: &DedupeOptions) -> Result<DedupeRun> {
    let _span = info_span!("deduplicate", rows = loaded.dataset.row_count()).entered();
    DedupeEngine::new(options)
        .run(&loaded.dataset)
        .context("deduplicate dataset")
}

// ============================================================================
// Stage 3: Output
// ============================================================================

/// Resolved destinations for the output stage.
#[derive(Debug, Clone)]
pub struct OutputPlan {
    pub dataset: Option<(PathBuf, DataFormat)>,
    pub report: Option<PathBuf>,
}

/// Decide where outputs go; fails before anything is written.
pub fn plan_outputs(request: &PipelineRequest, input_format: DataFormat) -> Result<OutputPlan> {
    if request.dry_run {
        return Ok(OutputPlan {
            dataset: None,
            report: None,
        });
    }
    let dataset = match &request.output {
        Some(path) => {
            let format = DataFormat::from_path(path)
                .with_context(|| format!("output path {}", path.display()))?;
            (path.clone(), format)
        }
        None => (
            default_output_path(&request.input, input_format),
            input_format,
        ),
    };
    Ok(OutputPlan {
        dataset: Some(dataset),
        report: request.report.clone(),
    })
}

pub fn output(plan: &OutputPlan, run: &DedupeRun, report: &DedupeReport) -> Result<()> {
    let _span = info_span!("output").entered();
    if let Some((path, format)) = &plan.dataset {
        write_dataset(&run.resolution.resolved_dataset, path, *format)
            .with_context(|| format!("write {}", path.display()))?;
    }
    if let Some(path) = &plan.report {
        write_report_json(report, path).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}

/// Run every stage for `request`.
pub fn run_pipeline(request: &PipelineRequest) -> Result<PipelineResult> {
    request.options.validate().context("validate options")?;
    let loaded = ingest(&request.input)?;
    let plan = plan_outputs(request, loaded.format)?;
    let run = deduplicate(&loaded, &request.options)?;
    let report =
        DedupeReport::from_run(&run).with_source(request.input.display().to_string());
    output(&plan, &run, &report)?;

    info!(
        rows_in = run.detection.row_count,
        rows_out = run.resolution.resolved_dataset.row_count(),
        total_duplicates = run.total_duplicates(),
        dry_run = request.dry_run,
        "pipeline finished"
    );
    Ok(PipelineResult {
        input: request.input.clone(),
        format: loaded.format,
        skipped_rows: loaded.skipped_rows,
        run,
        report,
        output_path: plan.dataset.map(|(path, _)| path),
        report_path: plan.report,
        dry_run: request.dry_run,
    })
}

/// Classify a pipeline failure for the response envelope.
pub fn error_kind(error: &anyhow::Error) -> ErrorKind {
    for cause in error.chain() {
        if let Some(error) = cause.downcast_ref::<IngestError>() {
            return error.kind();
        }
        if let Some(error) = cause.downcast_ref::<EngineError>() {
            return error.kind();
        }
        if let Some(error) = cause.downcast_ref::<DedupeError>() {
            return error.kind();
        }
        if cause.downcast_ref::<DetectionError>().is_some() {
            return ErrorKind::MethodExecutionFailure;
        }
        if cause.downcast_ref::<ReportError>().is_some()
            || cause.downcast_ref::<std::io::Error>().is_some()
        {
            return ErrorKind::Io;
        }
    }
    ErrorKind::Internal
}

/// Failure envelope with the full context chain as message.
pub fn failure_response(error: &anyhow::Error, elapsed_ms: u128) -> DedupeResponse {
    DedupeResponse::failure(error_kind(error), format!("{error:#}"), elapsed_ms)
}
