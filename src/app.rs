//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - ingests test-day records (or generates the demo lactation)
//! - runs the Wood's-model fit + KPI derivation
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, CommonArgs, DemoArgs, FitArgs, PlotArgs};
use crate::domain::FitConfig;
use crate::error::AppError;
use crate::io::ingest::IngestedData;

pub mod pipeline;

/// Entry point for the `lact` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Demo(args) => handle_demo(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;
    print_run(&run, &config)
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = demo_config_from_args(&args);
    let records = crate::data::generate_sample(&config)?;
    let ingest = IngestedData::from_records(records)?;
    let run = pipeline::run_fit_with_records(ingest, &config)?;
    print_run(&run, &config)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;

    let plot = crate::plot::render_plot_from_curve_file(&curve, args.width, args.height);

    println!("{plot}");
    Ok(())
}

/// Print the terminal report and write any requested exports.
fn print_run(run: &pipeline::RunOutput, config: &FitConfig) -> Result<(), AppError> {
    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.fit, &run.kpis, config)
    );
    println!("{}", crate::report::format_observations(&run.residuals));

    if config.plot {
        let peak_day = run.kpis.as_ref().ok().map(|k| k.time_to_peak);
        let plot = crate::plot::render_lactation_plot(
            &run.residuals,
            &run.fit.params,
            peak_day,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.residuals, &run.fit)?;
    }
    if let Some(path) = &config.export_curve {
        let kpis = run.kpis.as_ref().ok();
        crate::io::curve::write_curve_json(path, &run.fit, kpis, config)?;
    }

    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    let mut config = config_from_common(&args.common);
    config.input = args.input.clone();
    config
}

pub fn demo_config_from_args(args: &DemoArgs) -> FitConfig {
    let mut config = config_from_common(&args.common);
    config.sample_count = args.count;
    config.sample_seed = args.seed;
    config.sample_noise_sd = args.noise_sd;
    config.sample_params = crate::domain::WoodsParams {
        a: args.true_a,
        b: args.true_b,
        c: args.true_c,
    };
    config
}

fn config_from_common(common: &CommonArgs) -> FitConfig {
    FitConfig {
        lactation_length: common.lactation_length,
        persistency_day: common.persistency_day,
        persistency: common.persistency,
        bounds: crate::domain::ParamBounds {
            a_min: common.a_min,
            b_min: common.b_min,
            b_max: common.b_max,
            c_min: common.c_min,
            c_max: common.c_max,
        },
        max_iters: common.max_iters,
        plot: common.plot && !common.no_plot,
        plot_width: common.width,
        plot_height: common.height,
        export_results: common.export.clone(),
        export_curve: common.export_curve.clone(),
        ..FitConfig::default()
    }
}
