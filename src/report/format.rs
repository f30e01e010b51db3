//! Residual computation and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{FitConfig, Kpis, TestDay, WoodsFit};
use crate::error::{AppError, KpiError};
use crate::io::ingest::IngestedData;
use crate::models::predict;

/// A per-day fitted result.
#[derive(Debug, Clone, Copy)]
pub struct DayResidual {
    pub record: TestDay,
    pub y_fit: f64,
    pub residual: f64,
}

/// Compute fitted values and residuals for each record.
pub fn compute_residuals(records: &[TestDay], fit: &WoodsFit) -> Result<Vec<DayResidual>, AppError> {
    let mut out = Vec::with_capacity(records.len());
    for r in records {
        let y_fit = predict(r.day, &fit.params);
        if !y_fit.is_finite() {
            return Err(AppError::new(
                4,
                "Non-finite model prediction during residual computation.",
            ));
        }
        out.push(DayResidual {
            record: *r,
            y_fit,
            residual: r.yield_kg - y_fit,
        });
    }
    Ok(out)
}

/// Format the full run summary: dataset stats, fitted model, KPIs.
///
/// A KPI-level failure still shows the fitted parameters; only the indicator
/// block is replaced by the failure message.
pub fn format_run_summary(
    ingest: &IngestedData,
    fit: &WoodsFit,
    kpis: &Result<Kpis, KpiError>,
    config: &FitConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== lact - Lactation Curve Analysis (Wood's model) ===\n");
    out.push_str(&format!(
        "Records: n={} | day=[{:.0}, {:.0}] | yield=[{:.2}, {:.2}] kg\n",
        ingest.stats.n_points,
        ingest.stats.day_min,
        ingest.stats.day_max,
        ingest.stats.yield_min,
        ingest.stats.yield_max,
    ));
    if !ingest.row_errors.is_empty() {
        out.push_str(&format!(
            "Skipped {} malformed row(s):\n",
            ingest.row_errors.len()
        ));
        for e in &ingest.row_errors {
            out.push_str(&format!("  line {}: {}\n", e.line, e.message));
        }
    }

    out.push_str("\nModel: y(t) = a * t^b * e^(-c*t)\n");
    out.push_str(&format!("- a: {:.4} (yield scale)\n", fit.params.a));
    out.push_str(&format!("- b: {:.4} (pre-peak incline)\n", fit.params.b));
    out.push_str(&format!("- c: {:.6} (post-peak decline)\n", fit.params.c));
    out.push_str(&format!(
        "- SSE={:.3} RMSE={:.3} kg (n={})\n",
        fit.quality.sse, fit.quality.rmse, fit.quality.n
    ));

    out.push('\n');
    match kpis {
        Ok(k) => {
            out.push_str("Key performance indicators:\n");
            out.push_str(&format!("- Peak daily yield : {:.2} kg/day\n", k.peak_yield));
            out.push_str(&format!("- Time to peak     : {:.1} days\n", k.time_to_peak));
            out.push_str(&format!(
                "- Yield over observed span      : {:.0} kg\n",
                k.total_yield
            ));
            out.push_str(&format!(
                "- Standard {:.0}-day yield       : {:.0} kg\n",
                config.lactation_length, k.standard_yield
            ));
            out.push_str(&format!(
                "- Persistency ({}) : {:.1}{}\n",
                k.persistency_kind.display_name(),
                k.persistency,
                k.persistency_kind.unit_label(),
            ));
        }
        Err(e) => {
            out.push_str(&format!("Key performance indicators unavailable: {e}\n"));
        }
    }

    out
}

/// Format the per-day observation table.
pub fn format_observations(residuals: &[DayResidual]) -> String {
    let mut out = String::new();

    out.push_str("Observations vs fitted curve:\n");
    out.push_str(&format!(
        "{:>6} {:>12} {:>12} {:>12}\n",
        "day", "observed", "fitted", "residual"
    ));
    out.push_str(&format!("{:->6} {:->12} {:->12} {:->12}\n", "", "", "", ""));

    for r in residuals {
        out.push_str(&format!(
            "{:>6.0} {:>12.2} {:>12.2} {:>12.2}\n",
            r.record.day, r.record.yield_kg, r.y_fit, r.residual
        ));
    }

    out
}
