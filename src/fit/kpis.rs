//! Derived key performance indicators for a fitted lactation curve.
//!
//! All derivations are pure functions of the fitted parameters (plus the
//! configured lactation length and persistency convention); nothing here
//! touches the raw records.
//!
//! Formulas:
//! - time to peak: the stationary point of `a*t^b*e^(-c*t)`, i.e. `t = b/c`
//! - peak yield: the model evaluated at the peak day
//! - total yield: Simpson integral over the observed day span
//! - standard yield: Simpson integral over `[1, lactation_length]`
//! - persistency: see [`PersistencyKind`]

use crate::domain::{Kpis, PersistencyKind, WoodsParams};
use crate::error::KpiError;
use crate::math::integrate::{simpson, DEFAULT_PANELS};
use crate::models::predict;

/// Options for KPI derivation.
#[derive(Debug, Clone, Copy)]
pub struct KpiOptions {
    /// Standard lactation length in days (upper bound of the standard yield).
    pub lactation_length: f64,
    /// Reference day for the ratio persistency convention.
    pub persistency_day: f64,
    pub persistency: PersistencyKind,
}

impl Default for KpiOptions {
    fn default() -> Self {
        Self {
            lactation_length: 305.0,
            persistency_day: 250.0,
            persistency: PersistencyKind::Ratio,
        }
    }
}

/// Derive the KPIs for fitted parameters over the observed `(first, last)`
/// day span.
///
/// Fails with [`KpiError::PeakUndefined`] when the curve has no interior
/// peak (`b <= 0` or `c <= 0`); callers should still surface the fitted
/// parameters in that case.
pub fn derive_kpis(
    params: &WoodsParams,
    day_span: (f64, f64),
    opts: &KpiOptions,
) -> Result<Kpis, KpiError> {
    if !(params.b > 0.0 && params.c > 0.0) {
        return Err(KpiError::PeakUndefined { b: params.b, c: params.c });
    }

    let time_to_peak = params.b / params.c;
    let peak_yield = predict(time_to_peak, params);

    let (first, last) = day_span;
    let total_yield = simpson(|t| predict(t, params), first, last, DEFAULT_PANELS);
    let standard_yield = simpson(|t| predict(t, params), 1.0, opts.lactation_length, DEFAULT_PANELS);

    let persistency = match opts.persistency {
        PersistencyKind::Ratio => persistency_ratio(params.b, params.c, opts.persistency_day),
        PersistencyKind::LogDecline => persistency_log_decline(params.b, params.c),
    };

    Ok(Kpis {
        time_to_peak,
        peak_yield,
        total_yield,
        standard_yield,
        persistency,
        persistency_kind: opts.persistency,
    })
}

/// Yield at the reference day as a percentage of peak yield.
///
/// `100 * y(d) / y(b/c) = 100 * (c*d/b)^b * e^(b - c*d)` -- the scale `a`
/// cancels, so this is a pure function of `(b, c)`.
pub fn persistency_ratio(b: f64, c: f64, day: f64) -> f64 {
    100.0 * (c * day / b).powf(b) * (b - c * day).exp()
}

/// The `-(b + 1) * ln(c)` decline summary used in parts of the lactation
/// literature. Dimensionless; higher means a flatter post-peak curve.
pub fn persistency_log_decline(b: f64, c: f64) -> f64 {
    -(b + 1.0) * c.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Parameters from fitting the classic 13-point demo lactation.
    const FITTED: WoodsParams = WoodsParams { a: 9.0619, b: 0.44159, c: 0.0052588 };

    #[test]
    fn time_to_peak_is_b_over_c() {
        let kpis = derive_kpis(&FITTED, (15.0, 300.0), &KpiOptions::default()).unwrap();
        assert!((kpis.time_to_peak - FITTED.b / FITTED.c).abs() < 1e-12);
        // Peak around day 84 for this lactation.
        assert!((kpis.time_to_peak - 84.0).abs() < 1.0);
    }

    #[test]
    fn peak_yield_matches_model_at_peak_day() {
        let kpis = derive_kpis(&FITTED, (15.0, 300.0), &KpiOptions::default()).unwrap();
        let expected = predict(kpis.time_to_peak, &FITTED);
        assert!((kpis.peak_yield - expected).abs() < 1e-12);
        // The peak must dominate the rest of the curve.
        for t in [10.0, 50.0, 120.0, 250.0] {
            assert!(predict(t, &FITTED) <= kpis.peak_yield + 1e-9);
        }
    }

    #[test]
    fn total_yields_are_plausible_for_a_dairy_cow() {
        let kpis = derive_kpis(&FITTED, (15.0, 300.0), &KpiOptions::default()).unwrap();
        // ~9.8t over the observed span, ~10.2t over the standard 305 days.
        assert!((kpis.total_yield - 9791.0).abs() < 5.0);
        assert!((kpis.standard_yield - 10197.0).abs() < 5.0);
        assert!(kpis.standard_yield > kpis.total_yield);
    }

    #[test]
    fn ratio_persistency_is_independent_of_scale() {
        let kpis = derive_kpis(&FITTED, (15.0, 300.0), &KpiOptions::default()).unwrap();
        let scaled = WoodsParams { a: FITTED.a * 7.5, ..FITTED };
        let kpis_scaled = derive_kpis(&scaled, (15.0, 300.0), &KpiOptions::default()).unwrap();
        assert!((kpis.persistency - kpis_scaled.persistency).abs() < 1e-9);
        // ~67.6% of peak is still produced at day 250.
        assert!((kpis.persistency - 67.6).abs() < 0.5);
    }

    #[test]
    fn ratio_persistency_equals_yield_ratio() {
        let opts = KpiOptions::default();
        let by_formula = persistency_ratio(FITTED.b, FITTED.c, opts.persistency_day);
        let peak = predict(FITTED.b / FITTED.c, &FITTED);
        let by_ratio = 100.0 * predict(opts.persistency_day, &FITTED) / peak;
        assert!((by_formula - by_ratio).abs() < 1e-9);
    }

    #[test]
    fn log_decline_convention_is_selectable() {
        let opts = KpiOptions {
            persistency: PersistencyKind::LogDecline,
            ..KpiOptions::default()
        };
        let kpis = derive_kpis(&FITTED, (15.0, 300.0), &opts).unwrap();
        let expected = -(FITTED.b + 1.0) * FITTED.c.ln();
        assert!((kpis.persistency - expected).abs() < 1e-12);
        assert_eq!(kpis.persistency_kind, PersistencyKind::LogDecline);
    }

    #[test]
    fn non_positive_c_is_a_domain_error() {
        let p = WoodsParams { a: 10.0, b: 0.3, c: 0.0 };
        let err = derive_kpis(&p, (10.0, 200.0), &KpiOptions::default()).unwrap_err();
        assert!(matches!(err, KpiError::PeakUndefined { .. }));
    }

    #[test]
    fn non_positive_b_is_a_domain_error() {
        // Monotone-declining curve: no interior peak.
        let p = WoodsParams { a: 10.0, b: -0.1, c: 0.004 };
        let err = derive_kpis(&p, (10.0, 200.0), &KpiOptions::default()).unwrap_err();
        assert!(matches!(err, KpiError::PeakUndefined { .. }));
    }
}
