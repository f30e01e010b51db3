//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed test days: `o`
//! - fitted curve: `-` line
//! - modeled peak: `P`

use crate::domain::{CurveFile, WoodsParams};
use crate::models::predict;
use crate::report::DayResidual;

/// Render a plot for an in-memory fit result.
///
/// `peak_day` marks the modeled peak on the chart when the KPI is defined.
pub fn render_lactation_plot(
    residuals: &[DayResidual],
    params: &WoodsParams,
    peak_day: Option<f64>,
    width: usize,
    height: usize,
) -> String {
    let (t_min, t_max) = day_range_from_residuals(residuals).unwrap_or((1.0, 305.0));
    let curve = sample_curve(params, t_min, t_max, width.max(2));
    render_plot(residuals, &curve, t_min, t_max, width, height, peak_day, params)
}

/// Render a plot from a saved curve JSON file (curve only, no overlay points).
pub fn render_plot_from_curve_file(curve: &CurveFile, width: usize, height: usize) -> String {
    let (t_min, t_max) = day_range_from_grid(curve).unwrap_or((1.0, 305.0));
    let points: Vec<(f64, f64)> = curve
        .grid
        .day
        .iter()
        .zip(curve.grid.yield_kg.iter())
        .map(|(&t, &y)| (t, y))
        .collect();

    let peak_day = curve.kpis.map(|k| k.time_to_peak);
    render_plot(&[], &points, t_min, t_max, width, height, peak_day, &curve.params)
}

#[allow(clippy::too_many_arguments)]
fn render_plot(
    residuals: &[DayResidual],
    curve: &[(f64, f64)],
    t_min: f64,
    t_max: f64,
    width: usize,
    height: usize,
    peak_day: Option<f64>,
    params: &WoodsParams,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(residuals, curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    draw_curve(&mut grid, curve, t_min, t_max, y_min, y_max);

    for r in residuals {
        let x = map_x(r.record.day, t_min, t_max, width);
        let y = map_y(r.record.yield_kg, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    // Peak marker last so it is never buried under curve/points.
    if let Some(day) = peak_day {
        if day.is_finite() && day >= t_min && day <= t_max {
            let x = map_x(day, t_min, t_max, width);
            let y = map_y(predict(day, params), y_min, y_max, height);
            grid[y][x] = 'P';
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: day=[{t_min:.0}, {t_max:.0}] | yield=[{y_min:.2}, {y_max:.2}] kg\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn day_range_from_residuals(residuals: &[DayResidual]) -> Option<(f64, f64)> {
    let mut min_t = f64::INFINITY;
    let mut max_t = f64::NEG_INFINITY;
    for r in residuals {
        min_t = min_t.min(r.record.day);
        max_t = max_t.max(r.record.day);
    }
    if min_t.is_finite() && max_t.is_finite() && max_t > min_t {
        Some((min_t, max_t))
    } else {
        None
    }
}

fn day_range_from_grid(curve: &CurveFile) -> Option<(f64, f64)> {
    let mut min_t = f64::INFINITY;
    let mut max_t = f64::NEG_INFINITY;
    for &t in &curve.grid.day {
        min_t = min_t.min(t);
        max_t = max_t.max(t);
    }
    if min_t.is_finite() && max_t.is_finite() && max_t > min_t {
        Some((min_t, max_t))
    } else {
        None
    }
}

fn sample_curve(params: &WoodsParams, t_min: f64, t_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let t = t_min + u * (t_max - t_min);
        out.push((t, predict(t, params)));
    }
    out
}

fn y_range(residuals: &[DayResidual], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for r in residuals {
        min_y = min_y.min(r.record.yield_kg);
        max_y = max_y.max(r.record.yield_kg);
    }
    for &(_, y) in curve {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    t_min: f64,
    t_max: f64,
    y_min: f64,
    y_max: f64,
) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
