//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - validate test-day records before any fit is attempted
//! - initialize and refine Wood's parameters (log-linear start + LM)
//! - check converged parameters against plausibility bounds
//! - derive KPIs from a fitted curve

pub mod fitter;
pub mod kpis;

pub use fitter::*;
pub use kpis::*;
