//! The analysis pipeline shared by the `analyze` and `describe` commands.
//!
//! load -> clean -> derive metrics -> describe -> aggregate per date -> merge
//! -> correlation/ANOVA -> trend fits
//!
//! Both daily analyses (total views, mean engagement rates) run through the
//! same parameterized code path; only their `DailyPlan` differs.

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::aggregate::{Column, DailyTable, aggregate_daily, merge_daily};
use crate::data::{CleanedDataset, clean_dataset, enrich_dataset};
use crate::domain::{AnalysisConfig, CountryCode, Dataset, Metric, Reducer};
use crate::error::AppError;
use crate::fit::{TrendRequest, TrendSelection, fit_trends};
use crate::io::ingest::{RawDataset, load_datasets};
use crate::stats::{CountryStatistics, DailyStatistics, DailyStatsPlan, analyze_daily_table, describe_dataset};

/// Per-country row accounting from load to enrichment.
#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub country: CountryCode,
    pub rows_read: usize,
    /// Rows skipped by the loader (CSV framing or non-integer counts).
    pub parse_errors: usize,
    /// Rows removed by the cleaner (negative counts).
    pub dropped: usize,
    pub kept: usize,
    /// Rows with `views == 0`, whose engagement rates are undefined.
    pub undefined_rates: usize,
}

/// One daily analysis: which metrics to reduce and what to compute on them.
#[derive(Debug, Clone, Copy)]
pub struct DailyPlan {
    pub title: &'static str,
    pub metrics: &'static [Metric],
    pub reducer: Reducer,
    pub correlations: &'static [(Column, Column)],
    pub literal_anova: &'static [[Column; 3]],
    pub trends: &'static [TrendRequest],
}

const VIEWS: Column = Column::Metric(Metric::Views);
const RATE_LIKES: Column = Column::Metric(Metric::EngagementRateLikes);
const RATE_COMMENTS: Column = Column::Metric(Metric::EngagementRateComments);

/// Total daily views per country.
pub const VIEWS_PLAN: DailyPlan = DailyPlan {
    title: "Total daily views",
    metrics: &[Metric::Views],
    reducer: Reducer::Sum,
    correlations: &[(Column::CountryCode, VIEWS), (Column::DateCode, VIEWS)],
    literal_anova: &[[Column::CountryCode, Column::DateCode, VIEWS]],
    trends: &[TrendRequest {
        metric: Metric::Views,
        degrees: &[1],
        smooth: false,
    }],
};

/// Mean daily engagement rates per country.
pub const ENGAGEMENT_PLAN: DailyPlan = DailyPlan {
    title: "Mean daily engagement rates",
    metrics: &[Metric::EngagementRateLikes, Metric::EngagementRateComments],
    reducer: Reducer::Mean,
    correlations: &[
        (Column::CountryCode, RATE_LIKES),
        (Column::DateCode, RATE_LIKES),
        (Column::CountryCode, RATE_COMMENTS),
        (Column::DateCode, RATE_COMMENTS),
        (RATE_LIKES, RATE_COMMENTS),
    ],
    literal_anova: &[
        [Column::CountryCode, Column::DateCode, RATE_LIKES],
        [Column::CountryCode, Column::DateCode, RATE_COMMENTS],
        [Column::CountryCode, RATE_LIKES, RATE_COMMENTS],
    ],
    trends: &[
        TrendRequest {
            metric: Metric::EngagementRateLikes,
            degrees: &[1, 2, 3, 10],
            smooth: true,
        },
        TrendRequest {
            metric: Metric::EngagementRateComments,
            degrees: &[1, 3],
            smooth: true,
        },
    ],
};

/// Results of one `DailyPlan`.
#[derive(Debug, Clone)]
pub struct DailyAnalysis {
    pub title: &'static str,
    pub table: DailyTable,
    pub statistics: DailyStatistics,
    pub trends: TrendSelection,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: Vec<IngestSummary>,
    pub datasets: Vec<Dataset>,
    pub descriptive: Vec<CountryStatistics>,
    pub views: DailyAnalysis,
    pub engagement: DailyAnalysis,
}

/// Load the configured sources and run the full analysis.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let raw = load_datasets(&config.sources)?;
    analyze(raw, config)
}

/// Clean and enrich loaded datasets.
///
/// Countries are processed in parallel; output keeps the input order.
pub fn prepare(raw: Vec<RawDataset>) -> Result<(Vec<IngestSummary>, Vec<Dataset>), AppError> {
    if raw.is_empty() {
        return Err(AppError::no_data("No datasets configured."));
    }

    let prepared: Vec<(IngestSummary, Dataset)> = raw
        .into_par_iter()
        .map(|raw| {
            let cleaned = clean_dataset(&raw)?;
            if cleaned.rows.is_empty() {
                return Err(AppError::no_data(format!(
                    "{}: no usable rows after cleaning ({} read, {} dropped).",
                    raw.country, raw.rows_read, cleaned.dropped
                )));
            }
            Ok(summarize(&raw, cleaned))
        })
        .collect::<Result<_, AppError>>()?;

    Ok(prepared.into_iter().unzip())
}

fn summarize(raw: &RawDataset, cleaned: CleanedDataset) -> (IngestSummary, Dataset) {
    let dropped = cleaned.dropped;
    let dataset = enrich_dataset(cleaned);
    let undefined_rates = dataset
        .videos
        .iter()
        .filter(|v| v.engagement_rate_likes.is_none())
        .count();
    if undefined_rates > 0 {
        debug!("{}: {undefined_rates} rows with zero views have undefined rates", raw.country);
    }
    info!("{}: kept {} of {} rows", raw.country, dataset.videos.len(), raw.rows_read);

    let summary = IngestSummary {
        country: raw.country,
        rows_read: raw.rows_read,
        parse_errors: raw.row_errors.len(),
        dropped,
        kept: dataset.videos.len(),
        undefined_rates,
    };
    (summary, dataset)
}

/// Run everything after loading.
pub fn analyze(raw: Vec<RawDataset>, config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let (ingest, datasets) = prepare(raw)?;
    let descriptive = datasets.iter().map(describe_dataset).collect();

    let views = analyze_daily(&datasets, &VIEWS_PLAN, config);
    let engagement = analyze_daily(&datasets, &ENGAGEMENT_PLAN, config);

    Ok(RunOutput {
        ingest,
        datasets,
        descriptive,
        views,
        engagement,
    })
}

/// Aggregate, merge and analyze the datasets according to `plan`.
pub fn analyze_daily(datasets: &[Dataset], plan: &DailyPlan, config: &AnalysisConfig) -> DailyAnalysis {
    let per_country: Vec<_> = datasets
        .par_iter()
        .map(|ds| aggregate_daily(ds, plan.metrics, plan.reducer))
        .collect();
    let table = merge_daily(plan.metrics, plan.reducer, per_country);
    debug!("{}: merged table has {} rows", plan.title, table.len());

    let stats_plan = DailyStatsPlan {
        correlations: plan.correlations,
        literal_anova: plan.literal_anova,
    };
    let statistics = analyze_daily_table(&table, &stats_plan, config.anova_mode);
    let trends = fit_trends(&table, plan.trends, config.rolling_window);

    DailyAnalysis {
        title: plan.title,
        table,
        statistics,
        trends,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnovaMode, DEFAULT_ROLLING_WINDOW};
    use crate::io::ingest::read_dataset;

    const HEADER: &str = "video_id,trending_date,title,category_id,views,likes,dislikes,comment_count";

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            sources: Vec::new(),
            anova_mode: AnovaMode::Grouped,
            rolling_window: DEFAULT_ROLLING_WINDOW,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_json: None,
        }
    }

    fn raw(country: CountryCode, body: &str) -> RawDataset {
        read_dataset(country, format!("{HEADER}\n{body}").as_bytes()).unwrap()
    }

    fn two_countries() -> Vec<RawDataset> {
        vec![
            raw(
                CountryCode::Ca,
                "a,17.14.11,t,22,100,10,5,20\n\
                 b,17.14.11,t,22,50,5,0,5\n\
                 c,17.15.11,t,22,200,20,0,10\n\
                 d,17.16.11,t,22,300,30,3,3\n\
                 e,17.16.11,t,22,-5,1,1,1\n",
            ),
            raw(
                CountryCode::Us,
                "f,17.16.11,t,10,7,1,0,0\n\
                 g,17.15.11,t,10,5,0,0,1\n\
                 h,17.14.11,t,10,3,1,1,1\n\
                 i,17.14.11,t,10,0,0,0,0\n",
            ),
        ]
    }

    #[test]
    fn end_to_end_two_countries() {
        let out = analyze(two_countries(), &config()).unwrap();

        assert_eq!(out.ingest.len(), 2);
        assert_eq!(out.ingest[0].country, CountryCode::Ca);
        assert_eq!(out.ingest[0].rows_read, 5);
        assert_eq!(out.ingest[0].dropped, 1);
        assert_eq!(out.ingest[0].kept, 4);
        assert_eq!(out.ingest[1].undefined_rates, 1);

        let views = &out.views.table;
        assert_eq!(views.len(), 6);
        let sums: Vec<f64> = views
            .column(Column::Metric(Metric::Views))
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();
        assert_eq!(sums, vec![150.0, 200.0, 300.0, 3.0, 5.0, 7.0]);

        assert_eq!(out.views.statistics.correlations.len(), 2);
        assert_eq!(out.engagement.statistics.correlations.len(), 5);
        // Grouped mode: each metric by country and by date.
        assert_eq!(out.views.statistics.anova.len(), 2);
        assert_eq!(out.engagement.statistics.anova.len(), 4);

        // Degree 1 fits for views; engagement degree 10 and 3 need more dates.
        assert_eq!(out.views.trends.fits.len(), 2);
        assert!(out.engagement.trends.skipped.iter().any(|s| s.degree == 10));
    }

    #[test]
    fn literal_mode_uses_column_triples() {
        let mut cfg = config();
        cfg.anova_mode = AnovaMode::Literal;
        let out = analyze(two_countries(), &cfg).unwrap();
        assert_eq!(out.views.statistics.anova.len(), 1);
        assert_eq!(out.engagement.statistics.anova.len(), 3);
        assert_eq!(out.views.statistics.anova[0].groups, 3);
    }

    #[test]
    fn dataset_empty_after_cleaning_is_no_data() {
        let data = vec![raw(CountryCode::De, "a,17.14.11,t,1,-1,0,0,0\n")];
        let err = analyze(data, &config()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("DE"));
    }

    #[test]
    fn malformed_date_is_fatal() {
        let data = vec![raw(CountryCode::Fr, "a,2017-11-14,t,1,1,0,0,0\n")];
        let err = analyze(data, &config()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
