//! Export per-day results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per test day with the observed value, fitted value, and
//! residual.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::WoodsFit;
use crate::error::AppError;
use crate::report::DayResidual;

/// Write per-day results to a CSV file.
pub fn write_results_csv(
    path: &Path,
    residuals: &[DayResidual],
    fit: &WoodsFit,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "day,yield_obs,yield_fit,residual,a,b,c")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        writeln!(
            file,
            "{},{:.4},{:.4},{:.4},{:.6},{:.6},{:.8}",
            r.record.day,
            r.record.yield_kg,
            r.y_fit,
            r.residual,
            fit.params.a,
            fit.params.b,
            fit.params.c,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
