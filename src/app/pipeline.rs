//! Shared "fit pipeline" logic used by the `fit` and `demo` front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> fit -> KPIs -> residuals
//!
//! The command handlers can then focus on presentation (printing vs exports).

use crate::domain::{FitConfig, Kpis, WoodsFit};
use crate::error::{AppError, KpiError};
use crate::fit::{FitOptions, KpiOptions, derive_kpis, fit_woods};
use crate::io::ingest::{IngestedData, load_test_days};
use crate::report::DayResidual;

/// All computed outputs of a single fit run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub fit: WoodsFit,
    /// KPI derivation is kept as a `Result` so parameter output survives a
    /// KPI-level failure.
    pub kpis: Result<Kpis, KpiError>,
    pub residuals: Vec<DayResidual>,
}

/// Execute the full fitting pipeline on records from file or stdin.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    // 1) Ingest test-day records.
    let ingest = load_test_days(config)?;

    run_fit_with_records(ingest, config)
}

/// Execute the fitting pipeline on pre-ingested records.
///
/// This is the entry used by `demo`, where records come from the synthetic
/// generator rather than a CSV.
pub fn run_fit_with_records(
    ingest: IngestedData,
    config: &FitConfig,
) -> Result<RunOutput, AppError> {
    // 2) Fit Wood's model.
    let options = FitOptions {
        bounds: config.bounds,
        max_iters: config.max_iters,
    };
    let fit = fit_woods(&ingest.records, &options)?;

    // 3) Derive KPIs over the observed day span.
    let kpi_options = KpiOptions {
        lactation_length: config.lactation_length,
        persistency_day: config.persistency_day,
        persistency: config.persistency,
    };
    let span = (ingest.stats.day_min, ingest.stats.day_max);
    let kpis = derive_kpis(&fit.params, span, &kpi_options);

    // 4) Compute per-day residuals.
    let residuals = crate::report::compute_residuals(&ingest.records, &fit)?;

    Ok(RunOutput {
        ingest,
        fit,
        kpis,
        residuals,
    })
}
