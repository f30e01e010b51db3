//! Command-line parsing for the lactation curve analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::PersistencyKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lact", version, about = "Lactation Curve Analyzer (Wood's model)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit Wood's curve to test-day records, print KPIs, and optionally
    /// plot/export.
    Fit(FitArgs),
    /// Fit a reproducible synthetic lactation (no input file needed).
    Demo(DemoArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
}

/// Options for fitting real records.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Input CSV of `day,yield` records; reads stdin when omitted.
    ///
    /// Both headered CSV and headerless pasted pairs are accepted.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Options for the synthetic demo lactation.
#[derive(Debug, Parser, Clone)]
pub struct DemoArgs {
    /// Number of synthetic test days.
    #[arg(short = 'n', long, default_value_t = 13)]
    pub count: usize,

    /// Random seed for noise generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of the measurement noise (kg).
    #[arg(long, default_value_t = 0.8)]
    pub noise_sd: f64,

    /// True `a` (scale) of the generating curve.
    #[arg(long, default_value_t = 9.0)]
    pub true_a: f64,

    /// True `b` (incline) of the generating curve.
    #[arg(long, default_value_t = 0.45)]
    pub true_b: f64,

    /// True `c` (decline) of the generating curve.
    #[arg(long, default_value_t = 0.005)]
    pub true_c: f64,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Options shared by `fit` and `demo`.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Standard lactation length (days) for the standard-yield KPI and plots.
    #[arg(long, default_value_t = 305.0)]
    pub lactation_length: f64,

    /// Reference day for the ratio persistency convention.
    #[arg(long, default_value_t = 250.0)]
    pub persistency_day: f64,

    /// Persistency convention to report.
    #[arg(long, value_enum, default_value_t = PersistencyKind::Ratio)]
    pub persistency: PersistencyKind,

    /// Solver iteration budget.
    #[arg(long, default_value_t = 100)]
    pub max_iters: usize,

    /// Lower plausibility bound for `a` (exclusive).
    #[arg(long, default_value_t = 0.0)]
    pub a_min: f64,

    /// Lower plausibility bound for `b` (exclusive).
    #[arg(long, default_value_t = 0.0)]
    pub b_min: f64,

    /// Upper plausibility bound for `b` (exclusive).
    #[arg(long, default_value_t = 1.0)]
    pub b_max: f64,

    /// Lower plausibility bound for `c` (exclusive).
    #[arg(long, default_value_t = 0.0)]
    pub c_min: f64,

    /// Upper plausibility bound for `c` (exclusive).
    #[arg(long, default_value_t = 1.0)]
    pub c_max: f64,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-day results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export curve (parameters + KPIs + fitted grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

/// Options for plotting a saved curve.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Curve JSON file produced by `lact fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults_parse() {
        let cli = Cli::try_parse_from(["lact", "fit"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit subcommand");
        };
        assert!(args.input.is_none());
        assert_eq!(args.common.lactation_length, 305.0);
        assert_eq!(args.common.persistency, PersistencyKind::Ratio);
        assert_eq!(args.common.b_max, 1.0);
    }

    #[test]
    fn demo_flags_parse() {
        let cli = Cli::try_parse_from([
            "lact", "demo", "--seed", "7", "-n", "20", "--persistency", "log-decline",
        ])
        .unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo subcommand");
        };
        assert_eq!(args.seed, 7);
        assert_eq!(args.count, 20);
        assert_eq!(args.common.persistency, PersistencyKind::LogDecline);
    }
}
