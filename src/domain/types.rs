//! Shared domain types.
//!
//! Rows move through three shapes as the pipeline advances:
//!
//! - `RawVideoRow`: straight from the CSV, signed integers, date still a string
//! - `CleanVideo`: validated counts and a parsed `NaiveDate`
//! - `TrendingVideo`: a clean row plus the derived engagement rates

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Window (samples) of the rolling mean drawn under engagement trend fits.
pub const DEFAULT_ROLLING_WINDOW: usize = 20;

/// Country label of a trending dataset.
///
/// Declaration order is the default processing order and therefore the order
/// in which countries appear in merged tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum CountryCode {
    Ca,
    De,
    Fr,
    #[value(alias = "gb")]
    Uk,
    In,
    Us,
}

impl CountryCode {
    pub const ALL: [CountryCode; 6] = [
        CountryCode::Ca,
        CountryCode::De,
        CountryCode::Fr,
        CountryCode::Uk,
        CountryCode::In,
        CountryCode::Us,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CountryCode::Ca => "CA",
            CountryCode::De => "DE",
            CountryCode::Fr => "FR",
            CountryCode::Uk => "UK",
            CountryCode::In => "IN",
            CountryCode::Us => "US",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CountryCode::Ca => "Canada",
            CountryCode::De => "Germany",
            CountryCode::Fr => "France",
            CountryCode::Uk => "United Kingdom",
            CountryCode::In => "India",
            CountryCode::Us => "United States",
        }
    }

    /// File name of the dataset inside the data directory.
    ///
    /// The UK export is published under its ISO code (`GB`).
    pub fn default_file_name(self) -> &'static str {
        match self {
            CountryCode::Ca => "CAvideos.csv",
            CountryCode::De => "DEvideos.csv",
            CountryCode::Fr => "FRvideos.csv",
            CountryCode::Uk => "GBvideos.csv",
            CountryCode::In => "INvideos.csv",
            CountryCode::Us => "USvideos.csv",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CA" => Ok(CountryCode::Ca),
            "DE" => Ok(CountryCode::De),
            "FR" => Ok(CountryCode::Fr),
            "UK" | "GB" => Ok(CountryCode::Uk),
            "IN" => Ok(CountryCode::In),
            "US" => Ok(CountryCode::Us),
            other => Err(format!(
                "Unknown country code '{other}'. Expected one of: CA, DE, FR, UK, IN, US."
            )),
        }
    }
}

/// Numeric column of a `TrendingVideo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Views,
    Likes,
    Dislikes,
    CommentCount,
    EngagementRateLikes,
    EngagementRateComments,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Views,
        Metric::Likes,
        Metric::Dislikes,
        Metric::CommentCount,
        Metric::EngagementRateLikes,
        Metric::EngagementRateComments,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Views => "views",
            Metric::Likes => "likes",
            Metric::Dislikes => "dislikes",
            Metric::CommentCount => "comment_count",
            Metric::EngagementRateLikes => "engagement_rate_likes",
            Metric::EngagementRateComments => "engagement_rate_comments",
        }
    }

    /// Axis label for plots.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Views => "Views",
            Metric::Likes => "Likes",
            Metric::Dislikes => "Dislikes",
            Metric::CommentCount => "Comments",
            Metric::EngagementRateLikes => "Likes/dislikes engagement rate",
            Metric::EngagementRateComments => "Comments engagement rate",
        }
    }

    /// Value of this column for one video; `None` when the rate is undefined.
    pub fn value(self, video: &TrendingVideo) -> Option<f64> {
        let v = &video.video;
        match self {
            Metric::Views => Some(v.views as f64),
            Metric::Likes => Some(v.likes as f64),
            Metric::Dislikes => Some(v.dislikes as f64),
            Metric::CommentCount => Some(v.comment_count as f64),
            Metric::EngagementRateLikes => video.engagement_rate_likes,
            Metric::EngagementRateComments => video.engagement_rate_comments,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// How rows sharing a trending date are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    Sum,
    Mean,
}

/// Which one-way ANOVA to run on merged daily tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnovaMode {
    /// Partition the metric by category level (country, then date).
    Grouped,
    /// Treat the encoded country, encoded date and metric columns themselves as
    /// the groups. Kept for parity with the historical reports.
    Literal,
}

/// A CSV row as loaded, before any validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVideoRow {
    /// 1-based line number in the source file.
    pub line: usize,
    pub video_id: String,
    pub trending_date: String,
    pub category_id: i64,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub comment_count: i64,
}

/// A validated row: non-negative counts and a parsed trending date.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanVideo {
    pub video_id: String,
    pub trending_date: NaiveDate,
    pub category_id: u64,
    pub views: u64,
    pub likes: u64,
    pub dislikes: u64,
    /// Not part of the validity filter, so it stays signed.
    pub comment_count: i64,
}

/// A clean row plus derived engagement rates.
///
/// Both rates are `None` when `views == 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingVideo {
    pub video: CleanVideo,
    pub engagement_rate_likes: Option<f64>,
    pub engagement_rate_comments: Option<f64>,
}

/// One country's cleaned and enriched rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub country: CountryCode,
    pub videos: Vec<TrendingVideo>,
}

/// Where to load one country's dataset from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    pub country: CountryCode,
    pub path: PathBuf,
}

impl DatasetSource {
    /// The six default sources under `data_dir`, in `CountryCode::ALL` order.
    pub fn defaults(data_dir: &std::path::Path) -> Vec<DatasetSource> {
        CountryCode::ALL
            .iter()
            .map(|&country| DatasetSource {
                country,
                path: data_dir.join(country.default_file_name()),
            })
            .collect()
    }
}

impl FromStr for DatasetSource {
    type Err = String;

    /// Parse `CODE=PATH`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, path) = s
            .split_once('=')
            .ok_or_else(|| format!("Invalid source '{s}'. Expected CODE=PATH."))?;
        let path = path.trim();
        if path.is_empty() {
            return Err(format!("Invalid source '{s}': empty path."));
        }
        Ok(DatasetSource {
            country: code.parse()?,
            path: PathBuf::from(path),
        })
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags and environment (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub sources: Vec<DatasetSource>,
    pub anova_mode: AnovaMode,
    pub rolling_window: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_json: Option<PathBuf>,
}
