//! Per-date aggregation and the merged cross-country daily table.
//!
//! Each country's videos are grouped by trending date (ascending) and reduced
//! per metric. The per-country results are then stacked, in configured
//! country order, into a `DailyTable` keyed by `(country, date)` with integer
//! codes for both keys.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::encode::CategoricalEncoding;
use crate::domain::{CountryCode, Dataset, Metric, Reducer};

/// A column of the merged daily table usable in correlation/ANOVA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    CountryCode,
    DateCode,
    Metric(Metric),
}

impl Column {
    pub fn label(self) -> &'static str {
        match self {
            Column::CountryCode => "country_cat",
            Column::DateCode => "trending_date_cat",
            Column::Metric(m) => m.column_name(),
        }
    }
}

/// Reduced values of one country on one date, before merging.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    pub country: CountryCode,
    pub date: NaiveDate,
    /// Aligned with the metric list used to build it.
    pub values: Vec<Option<f64>>,
}

/// One `(country, date)` row of the merged table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedDailyMetric {
    pub country: CountryCode,
    pub date: NaiveDate,
    pub country_code: usize,
    pub date_code: usize,
    pub values: Vec<Option<f64>>,
}

/// All countries' daily aggregates for a set of metrics.
#[derive(Debug, Clone)]
pub struct DailyTable {
    pub metrics: Vec<Metric>,
    pub reducer: Reducer,
    pub rows: Vec<AggregatedDailyMetric>,
    pub countries: CategoricalEncoding<CountryCode>,
    pub dates: CategoricalEncoding<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn finish(self, reducer: Reducer) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        match reducer {
            Reducer::Sum => Some(self.sum),
            Reducer::Mean => Some(self.sum / self.count as f64),
        }
    }
}

/// Group `(date, value)` pairs by date and reduce each group.
///
/// Output is sorted by date. Undefined values are skipped; a date whose values
/// are all undefined reduces to `None`.
pub fn reduce_by_date<I>(pairs: I, reducer: Reducer) -> Vec<(NaiveDate, Option<f64>)>
where
    I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
{
    let mut groups: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();
    for (date, value) in pairs {
        groups.entry(date).or_default().push(value);
    }
    groups
        .into_iter()
        .map(|(date, acc)| (date, acc.finish(reducer)))
        .collect()
}

/// Aggregate one country's videos by trending date.
pub fn aggregate_daily(dataset: &Dataset, metrics: &[Metric], reducer: Reducer) -> Vec<DailyAggregate> {
    let mut groups: BTreeMap<NaiveDate, Vec<Accumulator>> = BTreeMap::new();
    for video in &dataset.videos {
        let accs = groups
            .entry(video.video.trending_date)
            .or_insert_with(|| vec![Accumulator::default(); metrics.len()]);
        for (acc, metric) in accs.iter_mut().zip(metrics) {
            acc.push(metric.value(video));
        }
    }

    groups
        .into_iter()
        .map(|(date, accs)| DailyAggregate {
            country: dataset.country,
            date,
            values: accs.into_iter().map(|a| a.finish(reducer)).collect(),
        })
        .collect()
}

/// Stack per-country aggregates and derive the categorical codes.
pub fn merge_daily(
    metrics: &[Metric],
    reducer: Reducer,
    per_country: Vec<Vec<DailyAggregate>>,
) -> DailyTable {
    let stacked: Vec<DailyAggregate> = per_country.into_iter().flatten().collect();

    let countries = CategoricalEncoding::from_values(stacked.iter().map(|r| &r.country));
    let dates = CategoricalEncoding::from_values(stacked.iter().map(|r| &r.date));

    let rows = stacked
        .into_iter()
        .map(|r| AggregatedDailyMetric {
            // Both encodings were built from these very rows.
            country_code: countries.code(&r.country).unwrap_or_default(),
            date_code: dates.code(&r.date).unwrap_or_default(),
            country: r.country,
            date: r.date,
            values: r.values,
        })
        .collect();

    DailyTable {
        metrics: metrics.to_vec(),
        reducer,
        rows,
        countries,
        dates,
    }
}

impl DailyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn metric_index(&self, metric: Metric) -> Option<usize> {
        self.metrics.iter().position(|&m| m == metric)
    }

    /// Values of a column in row order; `None` if the metric is not part of
    /// this table.
    pub fn column(&self, column: Column) -> Option<Vec<Option<f64>>> {
        match column {
            Column::CountryCode => Some(self.rows.iter().map(|r| Some(r.country_code as f64)).collect()),
            Column::DateCode => Some(self.rows.iter().map(|r| Some(r.date_code as f64)).collect()),
            Column::Metric(metric) => {
                let idx = self.metric_index(metric)?;
                Some(self.rows.iter().map(|r| r.values[idx]).collect())
            }
        }
    }

    /// One country's `(date, value)` series, in ascending date order.
    pub fn series(&self, country: CountryCode, metric: Metric) -> Vec<(NaiveDate, Option<f64>)> {
        let Some(idx) = self.metric_index(metric) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter(|r| r.country == country)
            .map(|r| (r.date, r.values[idx]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CleanVideo, TrendingVideo};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, d).unwrap()
    }

    fn video(day: u32, views: u64, rate: Option<f64>) -> TrendingVideo {
        TrendingVideo {
            video: CleanVideo {
                video_id: format!("v{day}-{views}"),
                trending_date: date(day),
                category_id: 1,
                views,
                likes: 0,
                dislikes: 0,
                comment_count: 0,
            },
            engagement_rate_likes: rate,
            engagement_rate_comments: rate,
        }
    }

    #[test]
    fn reduce_by_date_sums_and_sorts() {
        let pairs = vec![
            (date(3), Some(1.0)),
            (date(1), Some(2.0)),
            (date(3), Some(4.0)),
            (date(2), None),
        ];
        let out = reduce_by_date(pairs, Reducer::Sum);
        assert_eq!(out, vec![(date(1), Some(2.0)), (date(2), None), (date(3), Some(5.0))]);
    }

    #[test]
    fn mean_skips_undefined_values() {
        let pairs = vec![(date(1), Some(0.2)), (date(1), None), (date(1), Some(0.4))];
        let out = reduce_by_date(pairs, Reducer::Mean);
        assert!((out[0].1.unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn reducing_an_already_reduced_series_is_idempotent() {
        let pairs = vec![
            (date(2), Some(10.0)),
            (date(1), Some(3.0)),
            (date(2), Some(5.0)),
            (date(3), Some(7.0)),
        ];
        for reducer in [Reducer::Sum, Reducer::Mean] {
            let once = reduce_by_date(pairs.clone(), reducer);
            let twice = reduce_by_date(once.clone(), reducer);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn aggregate_daily_reduces_each_metric() {
        let ds = Dataset {
            country: CountryCode::Ca,
            videos: vec![
                video(2, 100, Some(0.1)),
                video(1, 10, None),
                video(2, 50, Some(0.3)),
            ],
        };
        let sums = aggregate_daily(&ds, &[Metric::Views], Reducer::Sum);
        assert_eq!(sums.len(), 2);
        assert_eq!(sums[0].date, date(1));
        assert_eq!(sums[0].values, vec![Some(10.0)]);
        assert_eq!(sums[1].values, vec![Some(150.0)]);

        let means = aggregate_daily(&ds, &[Metric::EngagementRateLikes], Reducer::Mean);
        assert_eq!(means[0].values, vec![None]);
        assert!((means[1].values[0].unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn two_countries_three_dates_merge_into_six_rows() {
        let ca = Dataset {
            country: CountryCode::Ca,
            videos: vec![
                video(1, 100, None),
                video(1, 50, None),
                video(2, 200, None),
                video(3, 300, None),
            ],
        };
        let us = Dataset {
            country: CountryCode::Us,
            videos: vec![
                video(3, 7, None),
                video(2, 5, None),
                video(1, 1, None),
                video(1, 2, None),
            ],
        };
        let metrics = [Metric::Views];
        let table = merge_daily(
            &metrics,
            Reducer::Sum,
            vec![
                aggregate_daily(&ca, &metrics, Reducer::Sum),
                aggregate_daily(&us, &metrics, Reducer::Sum),
            ],
        );

        assert_eq!(table.len(), 6);
        let views: Vec<f64> = table
            .column(Column::Metric(Metric::Views))
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();
        assert_eq!(views, vec![150.0, 200.0, 300.0, 3.0, 5.0, 7.0]);

        assert_eq!(table.countries.levels(), &[CountryCode::Ca, CountryCode::Us]);
        assert_eq!(table.dates.len(), 3);

        // Codes are unique per distinct value and agree between countries.
        for row in &table.rows {
            assert_eq!(table.countries.level(row.country_code), Some(&row.country));
            assert_eq!(table.dates.level(row.date_code), Some(&row.date));
        }
        assert_eq!(table.rows[0].date_code, table.rows[3].date_code);
        assert_ne!(table.rows[0].date_code, table.rows[1].date_code);
        assert_eq!(table.rows[5].country_code, 1);

        let us_series = table.series(CountryCode::Us, Metric::Views);
        assert_eq!(us_series, vec![(date(1), Some(3.0)), (date(2), Some(5.0)), (date(3), Some(7.0))]);
        assert!(table.column(Column::Metric(Metric::Likes)).is_none());
    }
}
