//! Command-line parsing for the sales reporting pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the analysis code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "salesrep",
    version,
    about = "Sales analysis and reporting pipeline"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
///
/// `run` executes the whole pipeline; the other four are the step-selection
/// surface for partial runs. Every step shares the same arguments so a
/// partial run sees exactly the configuration a full run would.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline: clean, metrics, visualize, report.
    Run(RunArgs),
    /// Clean and validate the input, write the cleaned CSV, print the audit.
    Clean(RunArgs),
    /// Compute metrics and print them (writes the cleaned CSV, no charts or tables).
    Metrics(RunArgs),
    /// Render the five charts and four tables from computed metrics.
    Visualize(RunArgs),
    /// Generate the narrative report (live service or mock).
    Report(RunArgs),
    /// Generate a synthetic sales CSV to use as pipeline input.
    Sample(SampleArgs),
}

/// Common options for all pipeline commands.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Path to the raw sales CSV (columns: date, model, units_sold, avg_price).
    #[arg(short = 'i', long, default_value = "data/raw/sales_data.csv")]
    pub input: PathBuf,

    /// Root of the data tree; the cleaned CSV is written to <DATA_DIR>/processed.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Root directory for generated artifacts.
    #[arg(short = 'o', long, default_value = "outputs")]
    pub out_dir: PathBuf,

    /// Use the deterministic mock narrative even if credentials are configured.
    #[arg(long)]
    pub mock: bool,
}

/// Options for `salesrep sample`.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Where to write the generated CSV.
    #[arg(short = 'o', long, default_value = "data/raw/sales_data.csv")]
    pub output: PathBuf,

    /// Number of months to generate, starting at 2022-01.
    #[arg(long, default_value_t = 24)]
    pub months: u32,

    /// RNG seed; the same seed reproduces the same file.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
