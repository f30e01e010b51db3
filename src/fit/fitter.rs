//! Fitting Wood's model to a set of test-day records.
//!
//! Pipeline per call (pure function of its inputs, no shared state):
//!
//! 1. validate the records (count, day positivity, yield sanity)
//! 2. build deterministic starting points:
//!    - log-linear regression of `ln y` on `[1, ln t, -t]` (exact on clean data)
//!    - the classic heuristic `a = mean yield, b = 0.2, c = 0.01`
//! 3. refine each start with Levenberg-Marquardt; keep the lowest SSE,
//!    breaking ties by start index so the result is reproducible
//! 4. reject converged parameters that fall outside the plausibility bounds

use nalgebra::{DMatrix, DVector};

use crate::domain::{ParamBounds, TestDay, FitQuality, WoodsFit, WoodsParams};
use crate::error::FitError;
use crate::math::lm::{refine, LmOptions, LmOutcome};
use crate::math::ols::solve_least_squares;

/// A 3-parameter model needs at least this many distinct days.
pub const MIN_DISTINCT_DAYS: usize = 3;

/// Fitting options that affect how the curve is calibrated.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Plausibility bounds checked after convergence.
    pub bounds: ParamBounds,
    /// Iteration budget for the solver.
    pub max_iters: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            bounds: ParamBounds::default(),
            max_iters: 100,
        }
    }
}

/// Fit Wood's model to the records, or report why that is impossible.
pub fn fit_woods(records: &[TestDay], opts: &FitOptions) -> Result<WoodsFit, FitError> {
    validate(records)?;

    let days: Vec<f64> = records.iter().map(|r| r.day).collect();
    let yields: Vec<f64> = records.iter().map(|r| r.yield_kg).collect();

    let lm_opts = LmOptions { max_iters: opts.max_iters };

    // Refine every start and keep the best converged candidate. The starts
    // are ordered, so ties resolve to the earlier (log-linear) one.
    let mut best: Option<LmOutcome> = None;
    let mut last_err: Option<FitError> = None;
    for start in starting_points(&days, &yields) {
        match refine(&days, &yields, start, &lm_opts) {
            Ok(out) => {
                let better = match &best {
                    Some(b) => out.sse < b.sse,
                    None => true,
                };
                if better {
                    best = Some(out);
                }
            }
            Err(e) => last_err = Some(e),
        }
    }

    let Some(best) = best else {
        return Err(last_err.unwrap_or(FitError::NoConvergence { iterations: opts.max_iters }));
    };

    if let Some(reason) = opts.bounds.violation(&best.params) {
        return Err(FitError::ImplausibleParameters {
            params: best.params,
            reason,
        });
    }

    let n = records.len();
    let rmse = (best.sse / n as f64).sqrt();
    if !(best.sse.is_finite() && rmse.is_finite()) {
        return Err(FitError::NoConvergence { iterations: opts.max_iters });
    }

    Ok(WoodsFit {
        params: best.params,
        quality: FitQuality { sse: best.sse, rmse, n },
    })
}

/// Reject inputs the fit is not well-posed for.
fn validate(records: &[TestDay]) -> Result<(), FitError> {
    for (index, r) in records.iter().enumerate() {
        if !(r.day.is_finite() && r.day > 0.0) {
            return Err(FitError::NonPositiveDay { index, day: r.day });
        }
        if !(r.yield_kg.is_finite() && r.yield_kg >= 0.0) {
            return Err(FitError::InvalidYield { index, yield_kg: r.yield_kg });
        }
    }

    let mut days: Vec<f64> = records.iter().map(|r| r.day).collect();
    days.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    days.dedup();
    if days.len() < MIN_DISTINCT_DAYS {
        return Err(FitError::InsufficientData {
            distinct: days.len(),
            required: MIN_DISTINCT_DAYS,
        });
    }

    Ok(())
}

/// Deterministic starting points for the solver, best guess first.
fn starting_points(days: &[f64], yields: &[f64]) -> Vec<WoodsParams> {
    let mut starts = Vec::with_capacity(2);
    if let Some(p) = log_linear_start(days, yields) {
        starts.push(p);
    }
    starts.push(heuristic_start(yields));
    starts
}

/// Regress `ln y` on `[1, ln t, -t]`; only records with `y > 0` contribute.
///
/// Returns `None` when fewer than three positive-yield records remain or the
/// regression is too ill-conditioned (e.g. all days nearly equal).
fn log_linear_start(days: &[f64], yields: &[f64]) -> Option<WoodsParams> {
    let rows: Vec<(f64, f64)> = days
        .iter()
        .zip(yields.iter())
        .filter(|&(_, &y)| y > 0.0)
        .map(|(&t, &y)| (t, y))
        .collect();
    if rows.len() < MIN_DISTINCT_DAYS {
        return None;
    }

    let n = rows.len();
    let mut x = DMatrix::<f64>::zeros(n, 3);
    let mut v = DVector::<f64>::zeros(n);
    for (i, &(t, y)) in rows.iter().enumerate() {
        x[(i, 0)] = 1.0;
        x[(i, 1)] = t.ln();
        x[(i, 2)] = -t;
        v[i] = y.ln();
    }

    let beta = solve_least_squares(&x, &v)?;
    let p = WoodsParams {
        a: beta[0].exp(),
        b: beta[1],
        c: beta[2],
    };
    // The regression itself does not constrain signs; a non-positive decline
    // rate cannot seed the log-space solver, so fall back to the heuristic.
    if p.a.is_finite() && p.b.is_finite() && p.c.is_finite() && p.a > 0.0 && p.c > 0.0 {
        Some(p)
    } else {
        None
    }
}

/// The textbook starting guess: mean yield scale, gentle incline and decline.
fn heuristic_start(yields: &[f64]) -> WoodsParams {
    let n = yields.len().max(1) as f64;
    let mean: f64 = yields.iter().sum::<f64>() / n;
    WoodsParams {
        a: if mean > 0.0 { mean } else { 1.0 },
        b: 0.2,
        c: 0.01,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::predict;

    fn record(day: f64, yield_kg: f64) -> TestDay {
        TestDay { day, yield_kg }
    }

    /// The worked example from the analysis notes: a mid-lactation herd test
    /// with a visible peak around day 50.
    fn example_records() -> Vec<TestDay> {
        vec![
            record(10.0, 20.0),
            record(50.0, 45.0),
            record(100.0, 38.0),
            record(150.0, 30.0),
            record(200.0, 22.0),
        ]
    }

    #[test]
    fn fewer_than_three_records_is_a_validation_error() {
        let records = vec![record(10.0, 20.0), record(50.0, 45.0)];
        let err = fit_woods(&records, &FitOptions::default()).unwrap_err();
        assert!(matches!(err, FitError::InsufficientData { distinct: 2, required: 3 }));
    }

    #[test]
    fn duplicate_days_do_not_count_as_distinct() {
        let records = vec![record(10.0, 20.0), record(10.0, 21.0), record(50.0, 45.0)];
        let err = fit_woods(&records, &FitOptions::default()).unwrap_err();
        assert!(matches!(err, FitError::InsufficientData { distinct: 2, .. }));
    }

    #[test]
    fn zero_or_negative_day_is_a_validation_error() {
        for bad in [0.0, -5.0, f64::NAN] {
            let records = vec![record(bad, 20.0), record(50.0, 45.0), record(100.0, 38.0)];
            let err = fit_woods(&records, &FitOptions::default()).unwrap_err();
            assert!(matches!(err, FitError::NonPositiveDay { index: 0, .. }), "day={bad}");
        }
    }

    #[test]
    fn negative_yield_is_a_validation_error() {
        let records = vec![record(10.0, 20.0), record(50.0, -1.0), record(100.0, 38.0)];
        let err = fit_woods(&records, &FitOptions::default()).unwrap_err();
        assert!(matches!(err, FitError::InvalidYield { index: 1, .. }));
    }

    #[test]
    fn example_converges_to_plausible_parameters() {
        let records = example_records();
        let fit = fit_woods(&records, &FitOptions::default()).unwrap();
        let p = fit.params;

        assert!(p.a > 0.0);
        assert!(p.b > 0.0 && p.b < 1.0);
        assert!(p.c > 0.0);
        assert!(fit.quality.sse.is_finite());
        assert!(fit.quality.rmse.is_finite());
        assert_eq!(fit.quality.n, 5);

        // The analytic peak b/c should land near the observed peak (day 50,
        // well inside [10, 100]).
        let t_peak = p.b / p.c;
        assert!(t_peak > 10.0 && t_peak < 100.0, "t_peak={t_peak}");

        // Modeled peak yield stays within the observed yield range.
        let peak = predict(t_peak, &p);
        assert!(peak > 20.0 && peak < 45.0, "peak={peak}");
    }

    #[test]
    fn noiseless_data_round_trips_the_generating_parameters() {
        let truth = WoodsParams { a: 15.0, b: 0.2, c: 0.003 };
        let records: Vec<TestDay> = (0..15)
            .map(|i| {
                let day = 10.0 + 20.0 * i as f64;
                record(day, predict(day, &truth))
            })
            .collect();

        let fit = fit_woods(&records, &FitOptions::default()).unwrap();
        assert!((fit.params.a - truth.a).abs() < 1e-6);
        assert!((fit.params.b - truth.b).abs() < 1e-7);
        assert!((fit.params.c - truth.c).abs() < 1e-8);
    }

    #[test]
    fn fitting_twice_produces_identical_output() {
        let records = example_records();
        let first = fit_woods(&records, &FitOptions::default()).unwrap();
        let second = fit_woods(&records, &FitOptions::default()).unwrap();
        assert_eq!(first.params.a.to_bits(), second.params.a.to_bits());
        assert_eq!(first.params.b.to_bits(), second.params.b.to_bits());
        assert_eq!(first.params.c.to_bits(), second.params.c.to_bits());
        assert_eq!(first.quality.sse.to_bits(), second.quality.sse.to_bits());
    }

    #[test]
    fn tight_bounds_turn_a_good_fit_into_implausible_parameters() {
        let records = example_records();
        // The example fits with b around 0.75; cap b below that.
        let opts = FitOptions {
            bounds: ParamBounds { b_max: 0.5, ..ParamBounds::default() },
            max_iters: 100,
        };
        let err = fit_woods(&records, &opts).unwrap_err();
        assert!(matches!(err, FitError::ImplausibleParameters { .. }));
    }

    #[test]
    fn zero_yields_are_accepted_as_records() {
        // A dry spell at the end of lactation: zero yields are valid input,
        // the log-linear start just skips them.
        let truth = WoodsParams { a: 20.0, b: 0.3, c: 0.006 };
        let mut records: Vec<TestDay> = (1..=10)
            .map(|i| {
                let day = 25.0 * i as f64;
                record(day, predict(day, &truth))
            })
            .collect();
        records.push(record(400.0, 0.0));

        let fit = fit_woods(&records, &FitOptions::default()).unwrap();
        assert!(fit.params.a > 0.0);
        assert!(fit.quality.sse.is_finite());
    }
}
