//! Evaluation of Wood's model `y(t) = a * t^b * e^(-c*t)`.
//!
//! The fitter relies on two primitive operations:
//! - predict `y(t)` given parameters (for residuals/KPIs/plots)
//! - build a Jacobian row in the solver's transformed parameter space
//!
//! Numerical notes:
//! - `t^b` is undefined at `t = 0` for non-integer `b` and `ln t` diverges, so
//!   evaluation clamps `t` to a small positive epsilon. Ingest/validation
//!   rejects non-positive days before they reach the fit, so the clamp only
//!   matters for plotting grids that start near zero.

use crate::domain::WoodsParams;

/// Epsilon for guarding against `t = 0` in model evaluation.
const T_EPS: f64 = 1e-9;

/// Predict `y(t)` for the given parameters.
pub fn predict(t: f64, p: &WoodsParams) -> f64 {
    let t = t.max(T_EPS);
    p.a * t.powf(p.b) * (-p.c * t).exp()
}

/// Jacobian row of the model with respect to `theta = (ln a, b, ln c)`.
///
/// The solver works in this transformed space so that `a > 0` and `c > 0`
/// hold by construction. With `y = a * t^b * e^(-c*t)`:
///
/// - `dy/d(ln a) = y`
/// - `dy/db      = y * ln t`
/// - `dy/d(ln c) = -c * t * y`
pub fn jacobian_row(t: f64, p: &WoodsParams) -> [f64; 3] {
    let t = t.max(T_EPS);
    let y = predict(t, p);
    [y, y * t.ln(), -p.c * t * y]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_matches_closed_form() {
        let p = WoodsParams { a: 15.0, b: 0.2, c: 0.003 };
        let t = 100.0;
        let expected = 15.0 * 100.0_f64.powf(0.2) * (-0.3_f64).exp();
        assert!((predict(t, &p) - expected).abs() < 1e-12);
    }

    #[test]
    fn predict_is_finite_near_zero() {
        let p = WoodsParams { a: 20.0, b: 0.35, c: 0.004 };
        let y = predict(0.0, &p);
        assert!(y.is_finite());
        assert!(y >= 0.0);
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let p = WoodsParams { a: 12.0, b: 0.3, c: 0.005 };
        let t = 80.0;
        let j = jacobian_row(t, &p);

        let h = 1e-7_f64;
        // ln a perturbation
        let pa = WoodsParams { a: p.a * h.exp(), ..p };
        let da = (predict(t, &pa) - predict(t, &p)) / h;
        assert!((j[0] - da).abs() < 1e-3 * j[0].abs().max(1.0));

        // b perturbation
        let pb = WoodsParams { b: p.b + h, ..p };
        let db = (predict(t, &pb) - predict(t, &p)) / h;
        assert!((j[1] - db).abs() < 1e-3 * j[1].abs().max(1.0));

        // ln c perturbation
        let pc = WoodsParams { c: p.c * h.exp(), ..p };
        let dc = (predict(t, &pc) - predict(t, &p)) / h;
        assert!((j[2] - dc).abs() < 1e-3 * j[2].abs().max(1.0));
    }
}
