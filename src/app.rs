//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments and resolves the dataset list
//! - runs the analysis pipeline
//! - prints reports/plots
//! - writes the optional JSON export

use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::aggregate::DailyTable;
use crate::cli::{AnalyzeArgs, Command, SourceArgs};
use crate::domain::{AnalysisConfig, DatasetSource};
use crate::error::AppError;
use crate::plot::{LineSeries, country_glyph, render_line_chart, render_trend_plot};

pub mod pipeline;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "TRENDING_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "data";

/// Entry point for the `trends` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .try_init()
        .ok();

    // `trends` and `trends --country CA` behave like `trends analyze ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Describe(args) => handle_describe(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args)?;
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_ingest_summary(&run.ingest));
    println!("{}", crate::report::format_descriptive(&run.descriptive));

    for analysis in [&run.views, &run.engagement] {
        println!("{}", crate::report::format_daily_analysis(analysis));
        if config.plot {
            for chart in daily_charts(&analysis.table, config.plot_width, config.plot_height) {
                println!("{chart}");
            }
            for trend in &analysis.trends.fits {
                println!("{}", render_trend_plot(trend, config.plot_width, config.plot_height));
            }
        }
    }

    if let Some(path) = &config.export_json {
        crate::io::export::write_analysis_json(path, &run, &config)?;
        info!("wrote {}", path.display());
    }

    Ok(())
}

fn handle_describe(args: SourceArgs) -> Result<(), AppError> {
    let sources = resolve_sources(&args)?;
    let raw = crate::io::ingest::load_datasets(&sources)?;
    let (ingest, datasets) = pipeline::prepare(raw)?;
    let stats: Vec<_> = datasets.iter().map(crate::stats::describe_dataset).collect();

    println!("{}", crate::report::format_ingest_summary(&ingest));
    println!("{}", crate::report::format_descriptive(&stats));
    Ok(())
}

fn handle_inspect(args: SourceArgs) -> Result<(), AppError> {
    let sources = resolve_sources(&args)?;
    let profiles = sources
        .iter()
        .map(crate::io::inspect::inspect_source)
        .collect::<Result<Vec<_>, _>>()?;

    print!("{}", crate::report::format_profiles(&profiles));
    Ok(())
}

/// One multi-country line chart per metric of the table.
fn daily_charts(table: &DailyTable, width: usize, height: usize) -> Vec<String> {
    table
        .metrics
        .iter()
        .map(|&metric| {
            let series: Vec<LineSeries> = table
                .countries
                .levels()
                .iter()
                .map(|&country| LineSeries {
                    label: country.as_str().to_string(),
                    glyph: country_glyph(country),
                    points: table
                        .series(country, metric)
                        .into_iter()
                        .filter_map(|(date, v)| Some((date, v?)))
                        .collect(),
                })
                .collect();
            let title = format!("{:?} {} per day", table.reducer, metric.display_name());
            render_line_chart(&title, &series, width, height)
        })
        .collect()
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> Result<AnalysisConfig, AppError> {
    if args.rolling_window == 0 {
        return Err(AppError::input("--rolling-window must be at least 1."));
    }
    Ok(AnalysisConfig {
        sources: resolve_sources(&args.sources)?,
        anova_mode: args.anova,
        rolling_window: args.rolling_window,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_json: args.export_json.clone(),
    })
}

/// Resolve the dataset list from flags, environment and defaults.
pub fn resolve_sources(args: &SourceArgs) -> Result<Vec<DatasetSource>, AppError> {
    dotenvy::dotenv().ok();
    let env_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
    resolve_sources_with(args, env_dir)
}

/// Rules:
/// - `--source` entries replace the default list
/// - otherwise the six default files under `--data-dir`, else `env_dir`, else `data`
/// - `--country` keeps only the named countries
fn resolve_sources_with(args: &SourceArgs, env_dir: Option<PathBuf>) -> Result<Vec<DatasetSource>, AppError> {
    let sources = if args.sources.is_empty() {
        let data_dir = args
            .data_dir
            .clone()
            .or(env_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        DatasetSource::defaults(&data_dir)
    } else {
        args.sources.clone()
    };

    if args.countries.is_empty() {
        return Ok(sources);
    }

    let selected: Vec<DatasetSource> = sources
        .into_iter()
        .filter(|s| args.countries.contains(&s.country))
        .collect();
    if selected.is_empty() {
        return Err(AppError::input("No configured dataset matches the requested countries."));
    }
    Ok(selected)
}

/// Rewrite argv so `trends` defaults to `trends analyze`.
///
/// Rules:
/// - `trends`                        -> `trends analyze`
/// - `trends --country CA ...`       -> `trends analyze --country CA ...`
/// - `trends --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
    }
    argv
}
