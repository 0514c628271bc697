//! Write analysis results to JSON.
//!
//! The file holds everything printed by `trends analyze` except the plots:
//! ingest accounting, descriptive statistics, and for each daily analysis its
//! correlations, ANOVA results and polynomial fits. Non-finite numbers are
//! written as `null`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::app::pipeline::{DailyAnalysis, IngestSummary, RunOutput};
use crate::domain::{AnalysisConfig, AnovaMode, Reducer};
use crate::error::AppError;
use crate::fit::{SkippedTrend, TrendFit};
use crate::stats::{AnovaEntry, CorrelationMatrix, CountryStatistics};

#[derive(Debug, Serialize)]
struct AnalysisFile<'a> {
    tool: &'static str,
    anova_mode: AnovaMode,
    rolling_window: usize,
    ingest: &'a [IngestSummary],
    descriptive: &'a [CountryStatistics],
    analyses: [DailySection<'a>; 2],
}

#[derive(Debug, Serialize)]
struct DailySection<'a> {
    title: &'a str,
    reducer: Reducer,
    rows: usize,
    correlations: &'a [CorrelationMatrix],
    anova: &'a [AnovaEntry],
    fits: &'a [TrendFit],
    skipped_fits: &'a [SkippedTrend],
}

impl<'a> DailySection<'a> {
    fn new(analysis: &'a DailyAnalysis) -> Self {
        Self {
            title: analysis.title,
            reducer: analysis.table.reducer,
            rows: analysis.table.len(),
            correlations: &analysis.statistics.correlations,
            anova: &analysis.statistics.anova,
            fits: &analysis.trends.fits,
            skipped_fits: &analysis.trends.skipped,
        }
    }
}

/// Write the results of a run as pretty-printed JSON.
pub fn write_analysis_json(path: &Path, run: &RunOutput, config: &AnalysisConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::numeric(format!("Failed to create JSON export '{}': {e}", path.display())))?;

    let doc = AnalysisFile {
        tool: "trends",
        anova_mode: config.anova_mode,
        rolling_window: config.rolling_window,
        ingest: &run.ingest,
        descriptive: &run.descriptive,
        analyses: [DailySection::new(&run.views), DailySection::new(&run.engagement)],
    };

    serde_json::to_writer_pretty(BufWriter::new(file), &doc)
        .map_err(|e| AppError::numeric(format!("Failed to write JSON export: {e}")))?;

    Ok(())
}
