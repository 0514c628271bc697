//! Per-country trend fits over a merged daily table.
//!
//! For each country the x coordinate is the date's position in that country's
//! ascending date sequence (its per-country date code), and y is the daily
//! value. Dates with an undefined value keep their position but are left out
//! of the fit.

use chrono::NaiveDate;
use log::warn;
use serde::Serialize;

use crate::aggregate::DailyTable;
use crate::domain::{CountryCode, Metric};
use crate::fit::polyfit::{PolynomialFit, fit_polynomial};
use crate::fit::smoothing::rolling_mean;

/// Which fits to run for one metric.
#[derive(Debug, Clone, Copy)]
pub struct TrendRequest {
    pub metric: Metric,
    pub degrees: &'static [usize],
    /// Attach a rolling mean of the raw series for plotting.
    pub smooth: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub x: f64,
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub smoothed: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendFit {
    pub country: CountryCode,
    pub metric: Metric,
    pub smoothed: bool,
    #[serde(skip)]
    pub points: Vec<TrendPoint>,
    pub fit: PolynomialFit,
}

impl TrendFit {
    /// Points drawn as markers: the rolling mean when smoothing is on,
    /// otherwise the raw values.
    pub fn markers(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| {
                let y = if self.smoothed { p.smoothed } else { p.value };
                Some((p.x, y?))
            })
            .collect()
    }
}

/// A requested fit that could not be produced.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedTrend {
    pub country: CountryCode,
    pub metric: Metric,
    pub degree: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct TrendSelection {
    pub fits: Vec<TrendFit>,
    pub skipped: Vec<SkippedTrend>,
}

/// Run every requested fit for every country in the table.
pub fn fit_trends(table: &DailyTable, requests: &[TrendRequest], rolling_window: usize) -> TrendSelection {
    let mut out = TrendSelection::default();

    for &country in table.countries.levels() {
        for request in requests {
            let series = table.series(country, request.metric);
            if series.is_empty() {
                continue;
            }

            let raw: Vec<Option<f64>> = series.iter().map(|(_, v)| *v).collect();
            let smoothed = if request.smooth {
                rolling_mean(&raw, rolling_window)
            } else {
                vec![None; raw.len()]
            };

            let points: Vec<TrendPoint> = series
                .iter()
                .zip(smoothed)
                .enumerate()
                .map(|(idx, (&(date, value), smoothed))| TrendPoint {
                    x: idx as f64,
                    date,
                    value,
                    smoothed,
                })
                .collect();

            let (xs, ys): (Vec<f64>, Vec<f64>) =
                points.iter().filter_map(|p| Some((p.x, p.value?))).unzip();

            for &degree in request.degrees {
                match fit_polynomial(&xs, &ys, degree) {
                    Ok(fit) => out.fits.push(TrendFit {
                        country,
                        metric: request.metric,
                        smoothed: request.smooth,
                        points: points.clone(),
                        fit,
                    }),
                    Err(e) => {
                        warn!("{country} {} degree {degree} fit skipped: {e}", request.metric);
                        out.skipped.push(SkippedTrend {
                            country,
                            metric: request.metric,
                            degree,
                            reason: e.message().to_string(),
                        });
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{DailyAggregate, merge_daily};
    use crate::domain::Reducer;

    fn table() -> DailyTable {
        let d = |day| NaiveDate::from_ymd_opt(2018, 4, day).unwrap();
        let ca: Vec<DailyAggregate> = (1..=6)
            .map(|day| DailyAggregate {
                country: CountryCode::Ca,
                date: d(day),
                values: vec![Some(10.0 * day as f64 + 1.0)],
            })
            .collect();
        let us = vec![DailyAggregate {
            country: CountryCode::Us,
            date: d(9),
            values: vec![Some(5.0)],
        }];
        merge_daily(&[Metric::Views], Reducer::Sum, vec![ca, us])
    }

    const VIEWS_LINEAR: [TrendRequest; 1] = [TrendRequest {
        metric: Metric::Views,
        degrees: &[1, 2],
        smooth: true,
    }];

    #[test]
    fn fits_per_country_with_local_date_codes() {
        let sel = fit_trends(&table(), &VIEWS_LINEAR, 3);
        let ca: Vec<&TrendFit> = sel.fits.iter().filter(|f| f.country == CountryCode::Ca).collect();
        assert_eq!(ca.len(), 2);
        // x = 0..5, y = 10(x+1) + 1 → slope 10, intercept 11
        let linear = &ca[0].fit;
        assert_eq!(linear.degree, 1);
        assert!((linear.coefficients[0] - 10.0).abs() < 1e-9);
        assert!((linear.coefficients[1] - 11.0).abs() < 1e-9);

        assert_eq!(ca[0].points[0].smoothed, None);
        assert_eq!(ca[0].points[2].smoothed, Some(21.0));
        assert_eq!(ca[0].markers().len(), 4);
    }

    #[test]
    fn short_series_are_skipped_not_fatal() {
        let sel = fit_trends(&table(), &VIEWS_LINEAR, 3);
        // US has a single date: degree 1 and 2 both need more points.
        let us_skipped: Vec<&SkippedTrend> =
            sel.skipped.iter().filter(|s| s.country == CountryCode::Us).collect();
        assert_eq!(us_skipped.len(), 2);
        assert!(sel.fits.iter().all(|f| f.country == CountryCode::Ca));
    }
}
