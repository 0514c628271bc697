//! One-way analysis of variance.
//!
//! `F = (SSB / (k − 1)) / (SSW / (N − k))`, p-value from the upper tail of
//! the F distribution with `(k − 1, N − k)` degrees of freedom.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub p_value: f64,
    pub df_between: usize,
    pub df_within: usize,
}

/// One-way ANOVA over independent groups.
///
/// Returns `None` for degenerate input: fewer than two groups, an empty group,
/// or no residual degrees of freedom (`N <= k`).
pub fn f_oneway(groups: &[&[f64]]) -> Option<AnovaResult> {
    let k = groups.len();
    if k < 2 || groups.iter().any(|g| g.is_empty()) {
        return None;
    }
    let n: usize = groups.iter().map(|g| g.len()).sum();
    if n <= k {
        return None;
    }

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for g in groups {
        let mean = g.iter().sum::<f64>() / g.len() as f64;
        ss_between += g.len() as f64 * (mean - grand_mean) * (mean - grand_mean);
        ss_within += g.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>();
    }

    let df_between = k - 1;
    let df_within = n - k;
    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;

    let (f_statistic, p_value) = if ms_within == 0.0 {
        if ms_between == 0.0 {
            (f64::NAN, f64::NAN)
        } else {
            (f64::INFINITY, 0.0)
        }
    } else {
        let f = ms_between / ms_within;
        (f, f_upper_tail(f, df_between, df_within))
    };

    Some(AnovaResult {
        f_statistic,
        p_value,
        df_between,
        df_within,
    })
}

fn f_upper_tail(f: f64, df_between: usize, df_within: usize) -> f64 {
    if !f.is_finite() {
        return f64::NAN;
    }
    match FisherSnedecor::new(df_between as f64, df_within as f64) {
        Ok(dist) => dist.sf(f).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

/// Split `values` into groups by key, in first-seen key order.
///
/// Rows with an undefined value are skipped; keys that end up with no values
/// produce no group.
pub fn partition_by<K: Eq + Hash + Clone>(keys: &[K], values: &[Option<f64>]) -> Vec<Vec<f64>> {
    let mut order: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<f64>> = Vec::new();
    for (key, value) in keys.iter().zip(values) {
        let Some(v) = value else { continue };
        let idx = *order.entry(key.clone()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[idx].push(*v);
    }
    groups
}
