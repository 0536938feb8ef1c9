//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the pipeline configuration (no ambient globals)
//! - dispatches the full run or a single pipeline step
//! - prints the formatted summaries

use clap::Parser;

use crate::cli::{Cli, Command, RunArgs, SampleArgs};
use crate::config::{NarrativeConfig, PipelineConfig};
use crate::error::AppError;
use crate::io::sample;

pub mod pipeline;

/// Entry point for the `salesrep` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Clean(args) => handle_clean(args),
        Command::Metrics(args) => handle_metrics(args),
        Command::Visualize(args) => handle_visualize(args),
        Command::Report(args) => handle_report(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn config_from_args(args: &RunArgs) -> PipelineConfig {
    PipelineConfig {
        input: args.input.clone(),
        data_dir: args.data_dir.clone(),
        out_dir: args.out_dir.clone(),
        narrative: NarrativeConfig::from_env(args.mock),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    config.ensure_directories()?;

    let run = pipeline::run_pipeline(&config)?;
    println!("{}", crate::report::format::format_run_summary(&run));
    Ok(())
}

fn handle_clean(args: RunArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    config.ensure_directories()?;

    let cleaned = pipeline::run_clean(&config)?;
    println!("{}", crate::report::format::format_clean_summary(&cleaned));
    println!("Cleaned data: {}", config.cleaned_data_path().display());
    Ok(())
}

fn handle_metrics(args: RunArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    config.ensure_directories()?;

    let cleaned = pipeline::run_clean(&config)?;
    let metrics = pipeline::run_metrics(&cleaned);
    println!("{}", crate::report::format::format_metrics_summary(&metrics));
    Ok(())
}

fn handle_visualize(args: RunArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    config.ensure_directories()?;

    let cleaned = pipeline::run_clean(&config)?;
    let metrics = pipeline::run_metrics(&cleaned);
    let artifacts = pipeline::run_visualize(&config, &metrics)?;

    for path in artifacts.charts.iter().chain(&artifacts.tables) {
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_report(args: RunArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    config.ensure_directories()?;

    let cleaned = pipeline::run_clean(&config)?;
    let metrics = pipeline::run_metrics(&cleaned);
    let artifacts = pipeline::run_visualize(&config, &metrics)?;
    let report_path = pipeline::run_report(&config, &metrics, &artifacts)?;

    println!("Executive report: {}", report_path.display());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample::SampleConfig {
        months: args.months,
        seed: args.seed,
    };
    let table = sample::generate_sample(&config)?;
    sample::write_sample(&args.output, &table)?;

    if let Some(summary) = table.summary() {
        println!(
            "Generated {} rows ({} models, {} to {})",
            summary.rows, summary.distinct_models, summary.date_start, summary.date_end
        );
        println!(
            "Total: {} units, revenue {:.2}",
            summary.total_units, summary.total_revenue
        );
    }
    println!("Sample data: {}", args.output.display());
    Ok(())
}
