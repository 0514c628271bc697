//! Correlation and ANOVA over a merged daily table.

use log::warn;
use serde::Serialize;

use crate::aggregate::{Column, DailyTable};
use crate::domain::AnovaMode;
use crate::stats::anova::{AnovaResult, f_oneway, partition_by};
use crate::stats::correlation::{CorrelationMatrix, correlation_matrix};

/// One ANOVA run with a human-readable description of its groups.
#[derive(Debug, Clone, Serialize)]
pub struct AnovaEntry {
    pub label: String,
    pub groups: usize,
    /// `None` when the input was degenerate.
    pub result: Option<AnovaResult>,
}

/// What to compute on a daily table.
#[derive(Debug, Clone, Copy)]
pub struct DailyStatsPlan<'a> {
    pub correlations: &'a [(Column, Column)],
    /// Column triples treated as groups in `AnovaMode::Literal`.
    pub literal_anova: &'a [[Column; 3]],
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyStatistics {
    pub correlations: Vec<CorrelationMatrix>,
    pub anova: Vec<AnovaEntry>,
}

/// Compute the planned correlations and the ANOVA for the selected mode.
///
/// Columns missing from the table are skipped with a warning.
pub fn analyze_daily_table(table: &DailyTable, plan: &DailyStatsPlan<'_>, mode: AnovaMode) -> DailyStatistics {
    let mut correlations = Vec::with_capacity(plan.correlations.len());
    for &(a, b) in plan.correlations {
        match (table.column(a), table.column(b)) {
            (Some(xs), Some(ys)) => {
                correlations.push(correlation_matrix(a.label(), &xs, b.label(), &ys));
            }
            _ => warn!("correlation {} / {} skipped: column not in table", a.label(), b.label()),
        }
    }

    let anova = match mode {
        AnovaMode::Literal => plan
            .literal_anova
            .iter()
            .filter_map(|triple| literal_anova(table, triple))
            .collect(),
        AnovaMode::Grouped => grouped_anova(table),
    };

    for entry in &anova {
        if entry.result.is_none() {
            warn!("ANOVA '{}' skipped: not enough data", entry.label);
        }
    }

    DailyStatistics { correlations, anova }
}

/// Treat whole columns as groups (complete rows only).
fn literal_anova(table: &DailyTable, columns: &[Column; 3]) -> Option<AnovaEntry> {
    let cols: Vec<Vec<Option<f64>>> = columns.iter().map(|&c| table.column(c)).collect::<Option<_>>()?;

    let mut groups: Vec<Vec<f64>> = vec![Vec::new(); cols.len()];
    for row in 0..table.len() {
        let values: Option<Vec<f64>> = cols.iter().map(|c| c[row]).collect();
        if let Some(values) = values {
            for (g, v) in groups.iter_mut().zip(values) {
                g.push(v);
            }
        }
    }

    let refs: Vec<&[f64]> = groups.iter().map(Vec::as_slice).collect();
    let label = columns.iter().map(|c| c.label()).collect::<Vec<_>>().join(" | ");
    Some(AnovaEntry {
        label,
        groups: refs.len(),
        result: f_oneway(&refs),
    })
}

/// Canonical one-way ANOVA: each metric partitioned by country, then by date.
fn grouped_anova(table: &DailyTable) -> Vec<AnovaEntry> {
    let country_keys: Vec<usize> = table.rows.iter().map(|r| r.country_code).collect();
    let date_keys: Vec<usize> = table.rows.iter().map(|r| r.date_code).collect();

    let mut out = Vec::new();
    for &metric in &table.metrics {
        let Some(values) = table.column(Column::Metric(metric)) else {
            continue;
        };
        for (factor, keys) in [("country", &country_keys), ("trending_date", &date_keys)] {
            let groups = partition_by(keys, &values);
            let refs: Vec<&[f64]> = groups.iter().map(Vec::as_slice).collect();
            out.push(AnovaEntry {
                label: format!("{} by {factor}", metric.column_name()),
                groups: refs.len(),
                result: f_oneway(&refs),
            });
        }
    }
    out
}
