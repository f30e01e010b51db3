//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single test-day record: day in milk and measured daily yield.
///
/// Input order is preserved for display; the fit itself does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestDay {
    /// Day in milk (DIM). Must be strictly positive: the model involves `t^b`
    /// and is unstable at `t = 0` for non-integer `b`.
    pub day: f64,
    /// Daily milk yield in kg. Must be non-negative.
    pub yield_kg: f64,
}

/// Fitted parameters of Wood's model `y(t) = a * t^b * e^(-c*t)`.
///
/// - `a`: scale, related to overall yield level
/// - `b`: pre-peak incline rate
/// - `c`: post-peak decline rate
///
/// Immutable once produced by the fitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WoodsParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
}

/// Output of a successful fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WoodsFit {
    pub params: WoodsParams,
    pub quality: FitQuality,
}

/// Which persistency convention to report.
///
/// The lactation literature does not agree on a single formula; both options
/// here are pure functions of `(b, c)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PersistencyKind {
    /// `100 * y(d_p) / y(peak)` at a reference day `d_p` (default 250).
    ///
    /// The scale parameter `a` cancels, leaving
    /// `100 * (c*d_p/b)^b * e^(b - c*d_p)`. Higher means production is better
    /// maintained after the peak.
    Ratio,
    /// `-(b + 1) * ln(c)`, a common monotonic summary of post-peak decline.
    LogDecline,
}

impl PersistencyKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            PersistencyKind::Ratio => "ratio (% of peak)",
            PersistencyKind::LogDecline => "log-decline",
        }
    }

    /// Unit suffix for formatted values.
    pub fn unit_label(self) -> &'static str {
        match self {
            PersistencyKind::Ratio => "%",
            PersistencyKind::LogDecline => "",
        }
    }
}

/// Derived key performance indicators for a fitted lactation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Day at which the modeled yield peaks: `b / c`.
    pub time_to_peak: f64,
    /// Modeled yield at the peak day.
    pub peak_yield: f64,
    /// Integral of the fitted curve over the observed day span.
    pub total_yield: f64,
    /// Integral of the fitted curve over `[1, lactation_length]`
    /// (the standard 305-day yield by default).
    pub standard_yield: f64,
    /// Post-peak persistency per the selected convention.
    pub persistency: f64,
    pub persistency_kind: PersistencyKind,
}

/// Plausibility bounds for fitted parameters.
///
/// These encode the agricultural-literature convention of what a sensible
/// Wood's fit looks like, not a mathematical constraint, so they are
/// configurable rather than baked into the fitter. All bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamBounds {
    pub a_min: f64,
    pub b_min: f64,
    pub b_max: f64,
    pub c_min: f64,
    pub c_max: f64,
}

impl Default for ParamBounds {
    fn default() -> Self {
        Self {
            a_min: 0.0,
            b_min: 0.0,
            b_max: 1.0,
            c_min: 0.0,
            c_max: 1.0,
        }
    }
}

impl ParamBounds {
    /// Check fitted parameters, returning a description of the first
    /// violation if any.
    pub fn violation(&self, p: &WoodsParams) -> Option<String> {
        if !(p.a > self.a_min) {
            return Some(format!("a={:.6} is not above {:.6}", p.a, self.a_min));
        }
        if !(p.b > self.b_min && p.b < self.b_max) {
            return Some(format!(
                "b={:.6} is outside ({:.6}, {:.6})",
                p.b, self.b_min, self.b_max
            ));
        }
        if !(p.c > self.c_min && p.c < self.c_max) {
            return Some(format!(
                "c={:.6} is outside ({:.6}, {:.6})",
                p.c, self.c_min, self.c_max
            ));
        }
        None
    }
}

/// Summary stats about the records actually used for fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub day_min: f64,
    pub day_max: f64,
    pub yield_min: f64,
    pub yield_max: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Input CSV path; `None` means read from stdin.
    pub input: Option<PathBuf>,

    /// Standard lactation length in days (integration upper bound for the
    /// standard yield KPI and the plotting range).
    pub lactation_length: f64,
    /// Reference day for the ratio persistency convention.
    pub persistency_day: f64,
    pub persistency: PersistencyKind,

    pub bounds: ParamBounds,
    /// Iteration budget for the nonlinear solver.
    pub max_iters: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,

    /// Synthetic-lactation settings (only used by `lact demo`).
    pub sample_count: usize,
    pub sample_seed: u64,
    pub sample_noise_sd: f64,
    pub sample_params: WoodsParams,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            input: None,
            lactation_length: 305.0,
            persistency_day: 250.0,
            persistency: PersistencyKind::Ratio,
            bounds: ParamBounds::default(),
            max_iters: 100,
            plot: true,
            plot_width: 100,
            plot_height: 25,
            export_results: None,
            export_curve: None,
            sample_count: 13,
            sample_seed: 42,
            sample_noise_sd: 0.8,
            sample_params: WoodsParams { a: 9.0, b: 0.45, c: 0.005 },
        }
    }
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub params: WoodsParams,
    pub quality: FitQuality,
    /// KPIs, if they were defined for the fitted parameters.
    pub kpis: Option<Kpis>,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub day: Vec<f64>,
    pub yield_kg: Vec<f64>,
}
