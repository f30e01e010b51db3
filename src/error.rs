//! Error types.
//!
//! Three layers, matching how failures surface to a user:
//!
//! - [`FitError`]: validation and convergence failures from the curve fitter.
//! - [`KpiError`]: a fit succeeded but a derived indicator is undefined.
//! - [`AppError`]: application-level error carrying a process exit code.
//!
//! Every fit/KPI failure has a distinct, human-readable message so the caller
//! can tell "bad input" apart from "the solver gave up".

use crate::domain::WoodsParams;

/// Validation or convergence failure from [`crate::fit::fit_woods`].
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// Fewer than the required number of distinct test days.
    InsufficientData { distinct: usize, required: usize },
    /// A day-in-milk value was zero, negative, or non-finite.
    NonPositiveDay { index: usize, day: f64 },
    /// A yield value was negative or non-finite.
    InvalidYield { index: usize, yield_kg: f64 },
    /// The solver exhausted its iteration budget without converging.
    NoConvergence { iterations: usize },
    /// The solver converged outside the plausibility bounds.
    ImplausibleParameters { params: WoodsParams, reason: String },
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::InsufficientData { distinct, required } => write!(
                f,
                "Insufficient data: {distinct} distinct test day(s), at least {required} required."
            ),
            FitError::NonPositiveDay { index, day } => write!(
                f,
                "Invalid day value at record {}: day-in-milk must be a positive number (got {day}).",
                index + 1
            ),
            FitError::InvalidYield { index, yield_kg } => write!(
                f,
                "Invalid yield value at record {}: yield must be a non-negative number (got {yield_kg}).",
                index + 1
            ),
            FitError::NoConvergence { iterations } => write!(
                f,
                "No convergence: the solver did not settle within {iterations} iterations."
            ),
            FitError::ImplausibleParameters { params, reason } => write!(
                f,
                "Fit converged to implausible parameters (a={:.4}, b={:.4}, c={:.6}): {reason}",
                params.a, params.b, params.c
            ),
        }
    }
}

impl std::error::Error for FitError {}

/// A derived KPI is undefined for the fitted parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum KpiError {
    /// The fitted curve has no interior peak (`b <= 0` or `c <= 0`), so
    /// time-to-peak `b/c` is not a stationary point.
    PeakUndefined { b: f64, c: f64 },
}

impl std::fmt::Display for KpiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KpiError::PeakUndefined { b, c } => write!(
                f,
                "Time-to-peak is undefined for b={b:.4}, c={c:.6}: the curve has no post-calving peak."
            ),
        }
    }
}

impl std::error::Error for KpiError {}

/// Application error with a process exit code.
///
/// Exit code conventions:
/// - 2: usage / input file problems
/// - 3: data validation failures (insufficient or invalid records)
/// - 4: numeric failures (no convergence, implausible fit, undefined KPI)
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let exit_code = match err {
            FitError::InsufficientData { .. }
            | FitError::NonPositiveDay { .. }
            | FitError::InvalidYield { .. } => 3,
            FitError::NoConvergence { .. } | FitError::ImplausibleParameters { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl From<KpiError> for AppError {
    fn from(err: KpiError) -> Self {
        AppError::new(4, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
