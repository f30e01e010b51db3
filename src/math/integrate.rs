//! Composite Simpson quadrature.
//!
//! Cumulative lactation yield is the definite integral of the fitted curve.
//! Wood's model has a closed form only via the incomplete gamma function, so
//! the integral is evaluated numerically. Simpson's rule on a fixed panel
//! count keeps the result deterministic and is plenty accurate for a smooth,
//! unimodal curve (error is O(h^4)).

/// Number of panels used for KPI integrals.
pub const DEFAULT_PANELS: usize = 512;

/// Integrate `f` over `[lo, hi]` with composite Simpson's rule.
///
/// `panels` is rounded up to the next even number; `lo > hi` integrates the
/// reversed interval with a sign flip, matching the usual convention.
pub fn simpson<F: Fn(f64) -> f64>(f: F, lo: f64, hi: f64, panels: usize) -> f64 {
    if lo == hi {
        return 0.0;
    }
    if lo > hi {
        return -simpson(f, hi, lo, panels);
    }

    let n = panels.max(2).next_multiple_of(2);
    let h = (hi - lo) / n as f64;

    let mut sum = f(lo) + f(hi);
    for i in 1..n {
        let coeff = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += coeff * f(lo + h * i as f64);
    }
    sum * h / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simpson_is_exact_for_cubics() {
        // Simpson integrates polynomials up to degree 3 exactly.
        let v = simpson(|t| t * t * t, 0.0, 2.0, 2);
        assert!((v - 4.0).abs() < 1e-12);
    }

    #[test]
    fn simpson_handles_reversed_and_empty_intervals() {
        assert_eq!(simpson(|t| t, 5.0, 5.0, 8), 0.0);
        let forward = simpson(|t| t, 0.0, 3.0, 8);
        let backward = simpson(|t| t, 3.0, 0.0, 8);
        assert!((forward + backward).abs() < 1e-12);
    }

    #[test]
    fn simpson_approximates_exponential_integral() {
        // Integral of e^(-t) over [0, 5] = 1 - e^(-5).
        let v = simpson(|t| (-t).exp(), 0.0, 5.0, DEFAULT_PANELS);
        assert!((v - (1.0 - (-5.0_f64).exp())).abs() < 1e-9);
    }
}
