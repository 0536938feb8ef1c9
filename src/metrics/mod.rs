//! Metrics calculation: the core of the pipeline.
//!
//! Three deterministic metric groups are derived from the cleaned table:
//!
//! - `trends`: period totals and MoM/YoY growth rates
//! - `elasticity`: price elasticity of demand per model
//! - `performance`: per-model totals, market share, and demand stability
//!
//! Input has already passed validation, so nothing here has an error path;
//! edge cases (zero denominators, too little data) surface as `None` or as
//! omitted entries, never as failures.

pub mod elasticity;
pub mod performance;
pub mod trends;

use crate::domain::{MetricsBundle, SalesTable};

/// Compute every metric group from the cleaned table.
pub fn compute_all(table: &SalesTable) -> MetricsBundle {
    MetricsBundle {
        trends: trends::compute(table),
        elasticity: elasticity::compute(table),
        performance: performance::compute(table),
    }
}

/// Percentage change from `prev` to `cur`.
///
/// Undefined (`None`) when the previous value is zero; the caller decides
/// whether that means "skip" (elasticity pairs) or "report as empty" (growth
/// columns). Never NaN, never a panic.
pub(crate) fn pct_change(prev: f64, cur: f64) -> Option<f64> {
    if prev == 0.0 {
        None
    } else {
        Some((cur - prev) / prev * 100.0)
    }
}

/// Mean over the defined values; `None` when nothing is defined.
pub(crate) fn mean_defined<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let defined: Vec<f64> = values.into_iter().flatten().collect();
    if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }
}

/// Sample standard deviation; `None` with fewer than two values.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}
