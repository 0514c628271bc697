//! Descriptive statistics (count, mean, std, min, quartiles, max).

use serde::Serialize;

use crate::domain::{CountryCode, Dataset, Metric};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1); `None` for a single value.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricSummary {
    pub metric: Metric,
    /// `None` when no defined values exist.
    pub summary: Option<Summary>,
    /// Rows whose value is undefined (zero-view rates).
    pub undefined: usize,
}

/// Descriptive statistics for every metric of one country.
#[derive(Debug, Clone, Serialize)]
pub struct CountryStatistics {
    pub country: CountryCode,
    pub rows: usize,
    pub metrics: Vec<MetricSummary>,
}

/// Summarize a sample. Returns `None` for an empty sample.
pub fn describe(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some((ss / (n as f64 - 1.0)).sqrt())
    } else {
        None
    };

    Some(Summary {
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Quantile of an ascending, non-empty slice with linear interpolation
/// between closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (n as f64 - 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Describe every metric of a dataset.
pub fn describe_dataset(dataset: &Dataset) -> CountryStatistics {
    let metrics = Metric::ALL
        .iter()
        .map(|&metric| {
            let mut values = Vec::with_capacity(dataset.videos.len());
            let mut undefined = 0usize;
            for video in &dataset.videos {
                match metric.value(video) {
                    Some(v) => values.push(v),
                    None => undefined += 1,
                }
            }
            MetricSummary {
                metric,
                summary: describe(&values),
                undefined,
            }
        })
        .collect();

    CountryStatistics {
        country: dataset.country,
        rows: dataset.videos.len(),
        metrics,
    }
}
