//! Least-squares polynomial fitting.
//!
//! The design matrix is a Vandermonde matrix with columns `x^d .. x^0`. Each
//! column is scaled to unit Euclidean norm before solving and the solution is
//! rescaled afterwards; without this a degree-10 fit over a few hundred dates
//! spans ~20 orders of magnitude between columns.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::error::AppError;
use crate::math::{fill_vandermonde_row, horner, solve_least_squares};

/// A fitted polynomial and its in-sample quality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolynomialFit {
    pub degree: usize,
    /// Highest power first.
    pub coefficients: Vec<f64>,
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
}

impl PolynomialFit {
    pub fn evaluate(&self, x: f64) -> f64 {
        horner(&self.coefficients, x)
    }
}

/// Fit a polynomial of the given degree to `(xs, ys)`.
pub fn fit_polynomial(xs: &[f64], ys: &[f64], degree: usize) -> Result<PolynomialFit, AppError> {
    if xs.len() != ys.len() {
        return Err(AppError::numeric(format!(
            "Polynomial fit needs equal-length inputs (x={}, y={}).",
            xs.len(),
            ys.len()
        )));
    }
    let n = xs.len();
    let k = degree + 1;
    if n < k {
        return Err(AppError::no_data(format!(
            "Degree-{degree} fit needs at least {k} points, got {n}."
        )));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(AppError::numeric("Polynomial fit inputs must be finite."));
    }

    let mut design = DMatrix::<f64>::zeros(n, k);
    let mut row = vec![0.0; k];
    for (i, &x) in xs.iter().enumerate() {
        fill_vandermonde_row(x, &mut row);
        for (j, &v) in row.iter().enumerate() {
            design[(i, j)] = v;
        }
    }

    let scales: Vec<f64> = (0..k)
        .map(|j| {
            let norm = design.column(j).norm();
            if norm > 0.0 { norm } else { 1.0 }
        })
        .collect();
    for (j, &s) in scales.iter().enumerate() {
        design.column_mut(j).unscale_mut(s);
    }

    let y = DVector::from_column_slice(ys);
    let beta = solve_least_squares(&design, &y).ok_or_else(|| {
        AppError::numeric(format!("Least squares solve failed for degree-{degree} fit."))
    })?;

    let coefficients: Vec<f64> = beta.iter().zip(&scales).map(|(b, s)| b / s).collect();

    let sse: f64 = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let r = y - horner(&coefficients, x);
            r * r
        })
        .sum();

    Ok(PolynomialFit {
        degree,
        coefficients,
        sse,
        rmse: (sse / n as f64).sqrt(),
        n,
    })
}
