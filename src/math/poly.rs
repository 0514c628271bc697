//! Polynomial basis helpers.
//!
//! Coefficients are ordered highest power first, so `[2, 3]` is `2x + 3`.

/// Fill a Vandermonde design row `[x^d, x^(d-1), ..., x, 1]`.
///
/// # Panics
/// Panics if `out` is empty; callers size it as `degree + 1`.
pub fn fill_vandermonde_row(x: f64, out: &mut [f64]) {
    let last = out.len() - 1;
    let mut p = 1.0;
    for j in (0..=last).rev() {
        out[j] = p;
        p *= x;
    }
}

/// Evaluate a polynomial with Horner's scheme.
pub fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vandermonde_row_is_highest_power_first() {
        let mut row = [0.0; 4];
        fill_vandermonde_row(2.0, &mut row);
        assert_eq!(row, [8.0, 4.0, 2.0, 1.0]);
    }

    #[test]
    fn horner_evaluates() {
        // 2x^2 - 3x + 1 at x = 3 → 10
        assert_eq!(horner(&[2.0, -3.0, 1.0], 3.0), 10.0);
        assert_eq!(horner(&[], 3.0), 0.0);
    }
}
