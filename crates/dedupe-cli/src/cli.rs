//! CLI argument definitions for the `dedupe` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use dedupe_model::{ConflictPolicy, DetectionMethod, MergeStrategy};

#[derive(Parser)]
#[command(
    name = "dedupe",
    version,
    about = "Find and resolve duplicate records in tabular data",
    long_about = "Find duplicate records in a CSV, TSV or JSON dataset and resolve them.\n\n\
                  Detects exact, case-insensitive, email-normalized and key-conflict duplicates.\n\
                  Conflicting records are reported for review instead of being removed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Detect and resolve duplicates in one dataset.
    Run(RunArgs),

    /// List the available detection methods.
    Methods,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Dataset to deduplicate (.csv, .tsv or .json).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// TOML file with deduplication options.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where to write the resolved dataset (default: <INPUT>_deduped.<ext>).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write a JSON report to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Column identifying a record; repeat for composite keys.
    #[arg(long = "key-column", value_name = "COLUMN")]
    pub key_columns: Vec<String>,

    /// Column holding email addresses; repeat for several.
    ///
    /// When omitted, email columns are detected from names and content.
    #[arg(long = "email-column", value_name = "COLUMN")]
    pub email_columns: Vec<String>,

    /// Detection methods to run, comma separated (default: all).
    #[arg(
        long = "detect",
        value_name = "METHOD",
        value_delimiter = ',',
        value_parser = parse_method
    )]
    pub detect: Vec<DetectionMethod>,

    /// How duplicate groups are resolved.
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Whether conflicting records take part in automatic resolution.
    #[arg(long = "conflict-policy", value_enum)]
    pub conflict_policy: Option<ConflictPolicyArg>,

    /// Detect and report without writing the resolved dataset.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the response envelope as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

fn parse_method(raw: &str) -> Result<DetectionMethod, String> {
    raw.parse()
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    RemoveDuplicates,
    MergeSmart,
}

impl From<StrategyArg> for MergeStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::RemoveDuplicates => MergeStrategy::RemoveDuplicates,
            StrategyArg::MergeSmart => MergeStrategy::MergeSmart,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ConflictPolicyArg {
    /// Keep every conflicting record for manual review.
    Exclude,
    /// Resolve conflicting records like any other duplicates.
    Include,
}

impl From<ConflictPolicyArg> for ConflictPolicy {
    fn from(value: ConflictPolicyArg) -> Self {
        match value {
            ConflictPolicyArg::Exclude => ConflictPolicy::Exclude,
            ConflictPolicyArg::Include => ConflictPolicy::Include,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
