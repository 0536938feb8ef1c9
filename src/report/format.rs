//! Formatted terminal output for the pipeline commands.
//!
//! We keep formatting code in one place so:
//! - the metrics code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::{Headline, MetricsBundle};
use crate::io::ingest::CleanedTable;
use crate::report::fmt_pct;

/// How many row errors the cleaning summary echoes before truncating.
const MAX_ROW_ERRORS: usize = 5;

/// Format the full run summary (per-stage notes + headline numbers).
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== salesrep - Sales Analysis Pipeline ===\n");
    for step in &run.steps {
        out.push_str(&format!("[{}] {}\n", step.name, step.note));
    }

    out.push('\n');
    out.push_str(&format_clean_summary(&run.cleaned));

    let headline = Headline::from_metrics(&run.metrics);
    out.push_str("\nHeadline:\n");
    out.push_str(&format!(
        "- Best-selling model: {}\n",
        headline.best_selling_model
    ));
    out.push_str(&format!(
        "- Avg YoY sales growth: {}\n",
        fmt_pct(headline.avg_yoy_units_growth)
    ));

    out.push_str("\nArtifacts:\n");
    for path in run.artifacts.charts.iter().chain(&run.artifacts.tables) {
        out.push_str(&format!("- {}\n", path.display()));
    }
    out.push_str(&format!("\nExecutive report: {}\n", run.report_path.display()));

    out
}

/// Format the cleaning stage summary (dataset stats + drop audit).
pub fn format_clean_summary(cleaned: &CleanedTable) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Rows: read={} kept={} dropped={} (coercion={}, non-positive={}, duplicate={})\n",
        cleaned.rows_read,
        cleaned.table.len(),
        cleaned.drops.total(),
        cleaned.drops.coercion,
        cleaned.drops.non_positive,
        cleaned.drops.duplicate,
    ));

    if let Some(summary) = cleaned.table.summary() {
        out.push_str(&format!(
            "Data: {} to {} | models={} | units={} | revenue={:.2} | mean price={:.2}\n",
            summary.date_start,
            summary.date_end,
            summary.distinct_models,
            summary.total_units,
            summary.total_revenue,
            summary.mean_price,
        ));
    }

    for err in cleaned.row_errors.iter().take(MAX_ROW_ERRORS) {
        out.push_str(&format!("  (dropped line {}) {}\n", err.line, err.message));
    }
    if cleaned.row_errors.len() > MAX_ROW_ERRORS {
        out.push_str(&format!(
            "  ... and {} more dropped rows\n",
            cleaned.row_errors.len() - MAX_ROW_ERRORS
        ));
    }

    out
}

/// Format the metrics-only summary printed by `salesrep metrics`.
pub fn format_metrics_summary(metrics: &MetricsBundle) -> String {
    let mut out = String::new();

    out.push_str("Trends:\n");
    let overall = &metrics.trends.overall;
    out.push_str(&format!(
        "- Monthly growth (avg): units={} revenue={}\n",
        fmt_pct(overall.avg_monthly_units_growth),
        fmt_pct(overall.avg_monthly_revenue_growth),
    ));
    out.push_str(&format!(
        "- YoY growth (avg): units={} revenue={}\n",
        fmt_pct(overall.avg_yoy_units_growth),
        fmt_pct(overall.avg_yoy_revenue_growth),
    ));

    out.push_str("\nModel performance:\n");
    for m in &metrics.performance.models {
        out.push_str(&format!(
            "{:>2}. {:<20} units={:<8} revenue={:<14.2} share={:>6.2}% cv={}\n",
            m.revenue_rank,
            m.model,
            m.total_units,
            m.total_revenue,
            m.market_share * 100.0,
            m.sales_cv
                .map(|cv| format!("{cv:.3}"))
                .unwrap_or_else(|| "n/a".to_string()),
        ));
    }

    if !metrics.elasticity.is_empty() {
        out.push_str("\nPrice elasticity:\n");
        for e in &metrics.elasticity {
            out.push_str(&format!(
                "- {:<20} e={:>8.3} ({}) over {} period pair(s)\n",
                e.model,
                e.elasticity,
                e.demand.display_name(),
                e.n_obs,
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_sales;
    use crate::metrics::compute_all;

    fn cleaned() -> CleanedTable {
        read_sales(
            "date,model,units_sold,avg_price\n\
             2022-01-01,X5,100,60000\n\
             2022-02-01,X5,80,66000\n\
             2022-01-01,3 Series,200,40000\n\
             bad-date,X5,1,1\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn clean_summary_reports_drop_audit() {
        let summary = format_clean_summary(&cleaned());
        assert!(summary.contains("read=4 kept=3 dropped=1"), "got:\n{summary}");
        assert!(summary.contains("coercion=1"));
        assert!(summary.contains("(dropped line 5)"), "got:\n{summary}");
    }

    #[test]
    fn metrics_summary_lists_models_by_rank() {
        let metrics = compute_all(&cleaned().table);
        let summary = format_metrics_summary(&metrics);
        assert!(summary.contains("Model performance:"));
        // X5 revenue = 100*60000 + 80*66000 = 11.28M > 3 Series 8M.
        let x5 = summary.find(" 1. X5").expect("X5 should be rank 1");
        let series3 = summary.find(" 2. 3 Series").expect("3 Series should be rank 2");
        assert!(x5 < series3);
    }
}
