//! Levenberg-Marquardt refinement for Wood's model.
//!
//! The objective is the plain sum of squared residuals
//!
//! ```text
//! S(a, b, c) = sum_i (y_i - a * t_i^b * e^(-c*t_i))^2
//! ```
//!
//! which is non-convex and sensitive to the starting point, so the solver is
//! paired with the log-linear initialization in `math::ols`.
//!
//! The iteration runs in the transformed space `theta = (ln a, b, ln c)`:
//! positivity of `a` and `c` then holds by construction and no active-set
//! bound handling is needed. Each step solves the damped normal equations
//!
//! ```text
//! (J^T J + lambda * diag(J^T J)) * delta = J^T r
//! ```
//!
//! with Marquardt's diagonal scaling. The damping factor `lambda` shrinks on
//! accepted steps and grows on rejected ones; everything is deterministic, so
//! identical inputs always produce bit-identical fits.

use nalgebra::{Matrix3, Vector3};

use crate::domain::WoodsParams;
use crate::error::FitError;
use crate::models::{jacobian_row, predict};

/// Relative SSE improvement below which the fit is considered converged.
const REL_TOL: f64 = 1e-12;

/// Initial damping factor.
const LAMBDA_INIT: f64 = 1e-3;

/// Inner retries per iteration before declaring a local minimum.
const MAX_STEP_RETRIES: usize = 20;

#[derive(Debug, Clone)]
pub struct LmOptions {
    /// Outer iteration budget; exceeding it is a convergence failure.
    pub max_iters: usize,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self { max_iters: 100 }
    }
}

/// A converged solution.
#[derive(Debug, Clone, Copy)]
pub struct LmOutcome {
    pub params: WoodsParams,
    pub sse: f64,
    pub iterations: usize,
}

fn unpack(theta: &Vector3<f64>) -> WoodsParams {
    WoodsParams {
        a: theta[0].exp(),
        b: theta[1],
        c: theta[2].exp(),
    }
}

fn sse(days: &[f64], yields: &[f64], p: &WoodsParams) -> f64 {
    let mut total = 0.0;
    for (&t, &y) in days.iter().zip(yields.iter()) {
        let r = y - predict(t, p);
        total += r * r;
    }
    if total.is_finite() { total } else { f64::INFINITY }
}

/// Refine `start` by damped Gauss-Newton steps until the SSE plateaus.
///
/// The start is clamped into the representable region (`a > 0`, `c > 0`)
/// before the first iteration. Returns [`FitError::NoConvergence`] when the
/// iteration budget runs out while the objective is still improving.
pub fn refine(
    days: &[f64],
    yields: &[f64],
    start: WoodsParams,
    opts: &LmOptions,
) -> Result<LmOutcome, FitError> {
    debug_assert_eq!(days.len(), yields.len());

    let a0 = if start.a.is_finite() && start.a > 0.0 { start.a } else { 1e-6 };
    let b0 = if start.b.is_finite() { start.b } else { 0.2 };
    let c0 = if start.c.is_finite() && start.c > 0.0 { start.c } else { 1e-6 };

    let mut theta = Vector3::new(a0.ln(), b0, c0.ln());
    let mut current_sse = sse(days, yields, &unpack(&theta));
    let mut lambda = LAMBDA_INIT;

    for iter in 0..opts.max_iters {
        let p = unpack(&theta);

        // Accumulate J^T J and J^T r without materializing the n x 3 Jacobian.
        let mut jtj = Matrix3::<f64>::zeros();
        let mut jtr = Vector3::<f64>::zeros();
        for (&t, &y) in days.iter().zip(yields.iter()) {
            let f = predict(t, &p);
            let r = y - f;
            let j = jacobian_row(t, &p);
            for i in 0..3 {
                jtr[i] += j[i] * r;
                for k in 0..3 {
                    jtj[(i, k)] += j[i] * j[k];
                }
            }
        }

        let mut stepped = false;
        for _ in 0..MAX_STEP_RETRIES {
            let mut damped = jtj;
            for i in 0..3 {
                damped[(i, i)] += lambda * jtj[(i, i)].max(1e-12);
            }

            let Some(chol) = damped.cholesky() else {
                lambda *= 10.0;
                continue;
            };
            let delta = chol.solve(&jtr);
            if !delta.iter().all(|v| v.is_finite()) {
                lambda *= 10.0;
                continue;
            }

            let theta_new = theta + delta;
            let sse_new = sse(days, yields, &unpack(&theta_new));
            if sse_new < current_sse {
                let rel = (current_sse - sse_new) / current_sse.max(f64::MIN_POSITIVE);
                theta = theta_new;
                current_sse = sse_new;
                lambda = (lambda * 0.3).max(1e-12);
                stepped = true;
                if rel < REL_TOL {
                    return Ok(LmOutcome {
                        params: unpack(&theta),
                        sse: current_sse,
                        iterations: iter + 1,
                    });
                }
                break;
            }
            lambda *= 10.0;
        }

        if !stepped {
            // No damped step improves the objective: a local minimum (to
            // machine precision) has been reached.
            return Ok(LmOutcome {
                params: unpack(&theta),
                sse: current_sse,
                iterations: iter + 1,
            });
        }
    }

    Err(FitError::NoConvergence { iterations: opts.max_iters })
}
