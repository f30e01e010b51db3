//! Least squares solver for the log-linear initialization.
//!
//! Wood's model is log-linear in its parameters:
//!
//! ```text
//! ln y = ln a + b * ln t - c * t
//! ```
//!
//! so a single linear regression of `ln y` on `[1, ln t, -t]` gives a strong
//! starting point for the nonlinear refinement. On noiseless data it recovers
//! the generating parameters outright.
//!
//! Implementation choices:
//! - SVD solve rather than QR: the design matrix is tall (n rows, 3 columns)
//!   and nalgebra's `QR::solve` only handles square systems.
//! - Test days clustered on a narrow span can make `ln t` and `t` nearly
//!   collinear, so ill-conditioned systems are rejected (`None`) instead of
//!   returning garbage coefficients.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails.
    for &tol in &[1e-10, 1e-7] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
