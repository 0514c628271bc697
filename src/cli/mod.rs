//! Command-line parsing for the trending statistics tool.
//!
//! Argument parsing and command dispatch are kept separate from the
//! statistics code; `app` turns these structs into an `AnalysisConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{AnovaMode, CountryCode, DEFAULT_ROLLING_WINDOW, DatasetSource};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "trends", version, about = "YouTube trending videos: cross-country statistics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full analysis: descriptive stats, daily aggregates, correlation,
    /// ANOVA, trend fits and plots.
    Analyze(AnalyzeArgs),
    /// Print descriptive statistics per country only.
    Describe(SourceArgs),
    /// List each dataset's columns and where cells are empty.
    Inspect(SourceArgs),
}

/// Which datasets to load.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Directory holding the `<CC>videos.csv` files [env: TRENDING_DATA_DIR] [default: data].
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Explicit dataset as CODE=PATH (repeatable). Replaces the default list.
    #[arg(long = "source", value_name = "CODE=PATH")]
    pub sources: Vec<DatasetSource>,

    /// Restrict the run to these countries (repeatable).
    #[arg(short = 'c', long = "country", value_enum, ignore_case = true)]
    pub countries: Vec<CountryCode>,
}

/// Options for the full analysis.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// ANOVA flavor for the daily tables.
    #[arg(long, value_enum, default_value_t = AnovaMode::Grouped)]
    pub anova: AnovaMode,

    /// Window of the rolling mean drawn over engagement-rate trends.
    #[arg(long, default_value_t = DEFAULT_ROLLING_WINDOW)]
    pub rolling_window: usize,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export results (stats, correlations, ANOVA, fits) to JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,
}
