//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted lactation:
//! - Wood's parameters and fit quality
//! - the derived KPIs (when defined)
//! - a precomputed `(day, yield)` grid for quick re-plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{CurveFile, CurveGrid, FitConfig, Kpis, WoodsFit, WoodsParams};
use crate::error::AppError;
use crate::models::predict;

/// Grid resolution for exported curves.
const GRID_POINTS: usize = 101;

/// Write a curve JSON file.
pub fn write_curve_json(
    path: &Path,
    fit: &WoodsFit,
    kpis: Option<&Kpis>,
    config: &FitConfig,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display()))
    })?;

    // The grid always spans the full standard lactation, like the original
    // chart, so a saved curve can be replotted without the raw records.
    let grid = build_grid(&fit.params, 1.0, config.lactation_length, GRID_POINTS);

    let curve = CurveFile {
        tool: "lact".to_string(),
        params: fit.params,
        quality: fit.quality,
        kpis: kpis.copied(),
        grid,
    };

    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display()))
    })?;
    let curve: CurveFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

/// Sample the fitted curve on an evenly spaced day grid.
pub fn build_grid(params: &WoodsParams, day_min: f64, day_max: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut lo = day_min;
    let mut hi = day_max;
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
        lo = 1.0;
        hi = 305.0;
    }

    let mut day = Vec::with_capacity(n);
    let mut yield_kg = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let t = lo + u * (hi - lo);
        day.push(t);
        yield_kg.push(predict(t, params));
    }

    CurveGrid { day, yield_kg }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FitQuality;

    #[test]
    fn grid_spans_requested_range() {
        let p = WoodsParams { a: 15.0, b: 0.2, c: 0.003 };
        let grid = build_grid(&p, 1.0, 305.0, 101);
        assert_eq!(grid.day.len(), 101);
        assert_eq!(grid.yield_kg.len(), 101);
        assert!((grid.day[0] - 1.0).abs() < 1e-12);
        assert!((grid.day[100] - 305.0).abs() < 1e-12);
        assert!(grid.yield_kg.iter().all(|y| y.is_finite() && *y >= 0.0));
    }

    #[test]
    fn degenerate_range_falls_back_to_standard_lactation() {
        let p = WoodsParams { a: 15.0, b: 0.2, c: 0.003 };
        let grid = build_grid(&p, 50.0, 50.0, 10);
        assert!((grid.day[0] - 1.0).abs() < 1e-12);
        assert!((grid.day[9] - 305.0).abs() < 1e-12);
    }

    #[test]
    fn curve_file_round_trips_through_serde() {
        let curve = CurveFile {
            tool: "lact".to_string(),
            params: WoodsParams { a: 9.06, b: 0.44, c: 0.0053 },
            quality: FitQuality { sse: 21.86, rmse: 1.30, n: 13 },
            kpis: None,
            grid: build_grid(&WoodsParams { a: 9.06, b: 0.44, c: 0.0053 }, 1.0, 305.0, 11),
        };

        let json = serde_json::to_string(&curve).unwrap();
        let back: CurveFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tool, "lact");
        assert!((back.params.b - 0.44).abs() < 1e-12);
        assert_eq!(back.grid.day.len(), 11);
    }
}
