//! Shared pipeline logic used by the full run and the per-step commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! clean -> metrics -> visualize -> report
//!
//! The CLI handlers can then focus on which prefix of the pipeline to run
//! and what to print. Stages are pure functions of their inputs: a partial
//! run recomputes its prerequisites from the input file instead of reading
//! intermediate state from disk.

use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::domain::MetricsBundle;
use crate::error::AppError;
use crate::io::ingest::{self, CleanedTable};

/// Paths of everything the artifact stage wrote.
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    pub charts: Vec<PathBuf>,
    pub tables: Vec<PathBuf>,
}

/// Outcome note for one completed pipeline stage.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub name: &'static str,
    pub note: String,
}

/// All computed outputs of a full `salesrep run`.
#[derive(Debug)]
pub struct RunOutput {
    pub cleaned: CleanedTable,
    pub metrics: MetricsBundle,
    pub artifacts: Artifacts,
    pub report_path: PathBuf,
    pub steps: Vec<StepReport>,
}

/// Execute the full pipeline in fixed order.
///
/// Each stage's outcome is recorded for the run summary. There are no
/// retries and no rollback: a failing stage surfaces as the run error and
/// whatever earlier stages wrote stays on disk.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunOutput, AppError> {
    let mut steps = Vec::new();

    let cleaned = run_clean(config)?;
    steps.push(StepReport {
        name: "clean",
        note: format!(
            "{} rows kept, {} dropped",
            cleaned.table.len(),
            cleaned.drops.total()
        ),
    });

    let metrics = run_metrics(&cleaned);
    steps.push(StepReport {
        name: "metrics",
        note: format!(
            "{} monthly periods, {} models, {} elasticity entries",
            metrics.trends.monthly.len(),
            metrics.performance.models.len(),
            metrics.elasticity.len()
        ),
    });

    let artifacts = run_visualize(config, &metrics)?;
    steps.push(StepReport {
        name: "visualize",
        note: format!(
            "{} charts, {} tables",
            artifacts.charts.len(),
            artifacts.tables.len()
        ),
    });

    let report_path = run_report(config, &metrics, &artifacts)?;
    steps.push(StepReport {
        name: "report",
        note: report_path.display().to_string(),
    });

    Ok(RunOutput {
        cleaned,
        metrics,
        artifacts,
        report_path,
        steps,
    })
}

/// Stage 1: ingest, clean, and persist the cleaned table.
pub fn run_clean(config: &PipelineConfig) -> Result<CleanedTable, AppError> {
    let cleaned = ingest::load_sales(&config.input)?;
    if cleaned.table.is_empty() {
        return Err(AppError::input(format!(
            "No valid rows left after cleaning '{}' ({} read, {} dropped).",
            config.input.display(),
            cleaned.rows_read,
            cleaned.drops.total()
        )));
    }
    crate::io::export::write_cleaned_csv(&config.cleaned_data_path(), &cleaned.table)?;
    Ok(cleaned)
}

/// Stage 2: derive the metrics bundle.
///
/// Infallible by design: the input has already passed validation and every
/// metric edge case degrades to `None` or an omitted entry.
pub fn run_metrics(cleaned: &CleanedTable) -> MetricsBundle {
    crate::metrics::compute_all(&cleaned.table)
}

/// Stage 3: render charts and write metric tables.
pub fn run_visualize(
    config: &PipelineConfig,
    metrics: &MetricsBundle,
) -> Result<Artifacts, AppError> {
    let charts = crate::plot::render_all_charts(metrics, &config.charts_dir())?;
    let tables = crate::io::export::write_metric_tables(metrics, &config.tables_dir())?;
    Ok(Artifacts { charts, tables })
}

/// Stage 4: generate the narrative report and write it to disk.
///
/// Service failures never fail the run; the deterministic mock takes over.
pub fn run_report(
    config: &PipelineConfig,
    metrics: &MetricsBundle,
    artifacts: &Artifacts,
) -> Result<PathBuf, AppError> {
    let context = crate::report::build_context(
        metrics,
        artifacts.charts.len(),
        artifacts.tables.len(),
    );
    let text = crate::narrative::generate_report(&config.narrative, metrics, &context);

    let path = config.report_path();
    std::fs::write(&path, text).map_err(|e| {
        AppError::artifact(format!("Failed to write report '{}': {e}", path.display()))
    })?;
    Ok(path)
}
