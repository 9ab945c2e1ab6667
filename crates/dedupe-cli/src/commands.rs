use std::time::Instant;

use comfy_table::Table;
use tracing::{info_span, warn};

use dedupe_cli::config::{OptionOverrides, apply_overrides, load_options};
use dedupe_cli::pipeline::{PipelineRequest, PipelineResult, failure_response, run_pipeline};
use dedupe_core::default_registry;
use dedupe_model::{DedupeResponse, DetectionMethod};

use crate::cli::RunArgs;
use crate::summary::apply_table_style;

/// Response envelope plus, on success, the full pipeline result.
pub struct RunOutcome {
    pub response: DedupeResponse,
    pub result: Option<PipelineResult>,
}

pub fn run_methods() {
    let mut table = Table::new();
    table.set_header(vec!["Method", "Description"]);
    apply_table_style(&mut table);
    let registry = default_registry();
    for method in DetectionMethod::ALL {
        let description = registry
            .get(method)
            .map_or(method.description(), |detector| detector.description());
        table.add_row(vec![method.as_str(), description]);
    }
    println!("{table}");
}

fn build_request(args: &RunArgs) -> anyhow::Result<PipelineRequest> {
    let options = load_options(args.config.as_deref())?;
    let overrides = OptionOverrides {
        key_columns: args.key_columns.clone(),
        email_columns: args.email_columns.clone(),
        detection_types: args.detect.clone(),
        merge_strategy: args.strategy.map(Into::into),
        conflict_policy: args.conflict_policy.map(Into::into),
    };
    let mut request = PipelineRequest::new(&args.input, apply_overrides(options, &overrides));
    request.output.clone_from(&args.output);
    request.report.clone_from(&args.report);
    request.dry_run = args.dry_run;
    Ok(request)
}

pub fn run_dedupe(args: &RunArgs) -> RunOutcome {
    let _span = info_span!("run", input = %args.input.display()).entered();
    let started = Instant::now();
    let outcome = build_request(args).and_then(|request| run_pipeline(&request));
    let elapsed_ms = started.elapsed().as_millis();
    match outcome {
        Ok(result) => RunOutcome {
            response: result.response(elapsed_ms),
            result: Some(result),
        },
        Err(error) => {
            warn!(error = %format!("{error:#}"), "run failed");
            RunOutcome {
                response: failure_response(&error, elapsed_ms),
                result: None,
            }
        }
    }
}
