//! Least squares solver.
//!
//! Polynomial trend fits solve small, tall problems:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! We solve with SVD rather than QR: nalgebra's `QR::solve` only handles
//! square systems, and high-degree Vandermonde matrices are close to
//! rank-deficient, where truncating tiny singular values gives the
//! minimum-norm solution instead of garbage.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if no tolerance yields a finite solution.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Singular values below `tol` are treated as zero. Start strict and relax.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
