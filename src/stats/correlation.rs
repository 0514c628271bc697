//! Pearson correlation.

use serde::Serialize;

/// 2×2 Pearson correlation matrix of two labelled series.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub labels: [String; 2],
    pub values: [[f64; 2]; 2],
    /// Complete pairs used.
    pub n: usize,
}

impl CorrelationMatrix {
    /// The off-diagonal coefficient.
    pub fn coefficient(&self) -> f64 {
        self.values[0][1]
    }
}

/// Pearson correlation coefficient.
///
/// NaN when the slices differ in length, hold fewer than two values, or
/// either series is constant.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    if n != b.len() || n < 2 {
        return f64::NAN;
    }
    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut sab = 0.0;
    let mut saa = 0.0;
    let mut sbb = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        sab += dx * dy;
        saa += dx * dx;
        sbb += dy * dy;
    }
    if saa == 0.0 || sbb == 0.0 {
        return f64::NAN;
    }
    (sab / (saa * sbb).sqrt()).clamp(-1.0, 1.0)
}

/// Correlation matrix over the rows where both values are defined.
pub fn correlation_matrix(
    label_a: &str,
    a: &[Option<f64>],
    label_b: &str,
    b: &[Option<f64>],
) -> CorrelationMatrix {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();

    let r = pearson(&xs, &ys);
    let self_corr = |v: &[f64]| {
        if v.len() >= 2 && v.iter().any(|x| *x != v[0]) { 1.0 } else { f64::NAN }
    };

    CorrelationMatrix {
        labels: [label_a.to_string(), label_b.to_string()],
        values: [[self_corr(&xs), r], [r, self_corr(&ys)]],
        n: xs.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_positive_and_negative() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &up) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &down) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_is_symmetric() {
        let a = [0.3, 1.7, 2.2, 5.9, 4.1, 0.05];
        let b = [10.0, 3.5, 8.25, 1.0, 7.7, 2.0];
        assert_eq!(pearson(&a, &b), pearson(&b, &a));
    }

    #[test]
    fn self_correlation_is_one() {
        let a = [0.3, 1.7, 2.2, 5.9, 4.1, 0.05];
        assert_eq!(pearson(&a, &a), 1.0);
    }

    #[test]
    fn constant_series_is_undefined() {
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[1.0], &[2.0]).is_nan());
    }

    #[test]
    fn matrix_uses_complete_pairs_only() {
        let a = [Some(1.0), Some(2.0), None, Some(3.0)];
        let b = [Some(2.0), Some(4.0), Some(100.0), Some(6.0)];
        let m = correlation_matrix("a", &a, "b", &b);
        assert_eq!(m.n, 3);
        assert_eq!(m.values[0][0], 1.0);
        assert_eq!(m.values[1][1], 1.0);
        assert!((m.coefficient() - 1.0).abs() < 1e-12);
        assert_eq!(m.values[0][1], m.values[1][0]);
    }

    #[test]
    fn matrix_of_constant_column_is_nan() {
        let a = [Some(5.0), Some(5.0), Some(5.0)];
        let b = [Some(1.0), Some(2.0), Some(3.0)];
        let m = correlation_matrix("a", &a, "b", &b);
        assert!(m.values[0][0].is_nan());
        assert!(m.coefficient().is_nan());
        assert_eq!(m.values[1][1], 1.0);
    }
}
