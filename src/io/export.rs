//! Export the cleaned data and the metric tables to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts. Each table is rendered to a string first so the exact output can
//! be tested without touching the filesystem; undefined values (`None`)
//! render as empty fields.

use std::path::{Path, PathBuf};

use crate::domain::{MetricsBundle, SalesTable};
use crate::error::AppError;

/// Fixed table file names, in write order.
pub const TABLE_FILES: [&str; 4] = [
    "model_performance.csv",
    "monthly_trends.csv",
    "yearly_trends.csv",
    "price_elasticity.csv",
];

/// Write all four metric tables into `tables_dir`.
pub fn write_metric_tables(
    metrics: &MetricsBundle,
    tables_dir: &Path,
) -> Result<Vec<PathBuf>, AppError> {
    let renders = [
        render_model_performance(metrics),
        render_monthly_trends(metrics),
        render_yearly_trends(metrics),
        render_elasticity(metrics),
    ];

    let mut paths = Vec::with_capacity(TABLE_FILES.len());
    for (name, contents) in TABLE_FILES.iter().zip(renders) {
        let path = tables_dir.join(name);
        write_file(&path, &contents)?;
        paths.push(path);
    }
    Ok(paths)
}

/// Write the cleaned table to `path` (the `data/processed` artifact).
pub fn write_cleaned_csv(path: &Path, table: &SalesTable) -> Result<PathBuf, AppError> {
    write_file(path, &render_cleaned_csv(table))?;
    Ok(path.to_path_buf())
}

/// Render the cleaned table, derived columns included.
///
/// Numeric fields use plain `Display` formatting so re-ingesting this file
/// reproduces the exact same records (cleaning idempotence).
pub fn render_cleaned_csv(table: &SalesTable) -> String {
    let mut out = String::from("date,model,units_sold,avg_price,revenue,year,month,quarter\n");
    for r in table.records() {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            r.date,
            csv_field(&r.model),
            r.units_sold,
            r.avg_price,
            r.revenue,
            r.year,
            r.month,
            r.quarter,
        ));
    }
    out
}

pub fn render_model_performance(metrics: &MetricsBundle) -> String {
    let mut out = String::from(
        "model,total_units,avg_units,units_std,total_revenue,avg_revenue,avg_price,market_share,sales_cv,revenue_rank\n",
    );
    for m in &metrics.performance.models {
        out.push_str(&format!(
            "{},{},{:.4},{},{:.2},{:.2},{:.2},{:.6},{},{}\n",
            csv_field(&m.model),
            m.total_units,
            m.avg_units,
            fmt_opt(m.units_std, 4),
            m.total_revenue,
            m.avg_revenue,
            m.avg_price,
            m.market_share,
            fmt_opt(m.sales_cv, 6),
            m.revenue_rank,
        ));
    }
    out
}

pub fn render_monthly_trends(metrics: &MetricsBundle) -> String {
    let mut out =
        String::from("year,month,units_sold,revenue,avg_price,units_growth_pct,revenue_growth_pct\n");
    for t in &metrics.trends.monthly {
        out.push_str(&format!(
            "{},{},{},{:.2},{:.2},{},{}\n",
            t.year,
            t.month,
            t.units_sold,
            t.revenue,
            t.avg_price,
            fmt_opt(t.units_growth_pct, 4),
            fmt_opt(t.revenue_growth_pct, 4),
        ));
    }
    out
}

pub fn render_yearly_trends(metrics: &MetricsBundle) -> String {
    let mut out =
        String::from("year,units_sold,revenue,avg_price,units_growth_pct,revenue_growth_pct\n");
    for t in &metrics.trends.yearly {
        out.push_str(&format!(
            "{},{},{:.2},{:.2},{},{}\n",
            t.year,
            t.units_sold,
            t.revenue,
            t.avg_price,
            fmt_opt(t.units_growth_pct, 4),
            fmt_opt(t.revenue_growth_pct, 4),
        ));
    }
    out
}

pub fn render_elasticity(metrics: &MetricsBundle) -> String {
    let mut out = String::from("model,elasticity,demand,avg_price,avg_units,n_obs\n");
    for e in &metrics.elasticity {
        out.push_str(&format!(
            "{},{:.6},{},{:.2},{:.2},{}\n",
            csv_field(&e.model),
            e.elasticity,
            e.demand.display_name(),
            e.avg_price,
            e.avg_units,
            e.n_obs,
        ));
    }
    out
}

fn write_file(path: &Path, contents: &str) -> Result<(), AppError> {
    std::fs::write(path, contents).map_err(|e| {
        AppError::artifact(format!("Failed to write table '{}': {e}", path.display()))
    })
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => String::new(),
    }
}

/// Quote a free-text field when it would break the CSV structure.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_sales;
    use crate::metrics::compute_all;

    fn sample_metrics() -> MetricsBundle {
        let cleaned = read_sales(
            "date,model,units_sold,avg_price\n\
             2022-01-01,X5,100,60000\n\
             2022-02-01,X5,110,61000\n\
             2022-01-01,3 Series,200,40000\n\
             2022-02-01,3 Series,190,41000\n"
                .as_bytes(),
        )
        .unwrap();
        compute_all(&cleaned.table)
    }

    #[test]
    fn performance_table_has_one_row_per_model() {
        let rendered = render_model_performance(&sample_metrics());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("model,total_units"));
        // Sorted by total revenue: 3 Series (15.79M) ahead of X5 (12.71M).
        assert!(lines[1].starts_with("3 Series,"), "got: {}", lines[1]);
        assert!(lines[2].starts_with("X5,"), "got: {}", lines[2]);
    }

    #[test]
    fn monthly_trends_first_growth_is_empty() {
        let rendered = render_monthly_trends(&sample_metrics());
        let first_row = rendered.lines().nth(1).unwrap();
        // First period has no prior month, so both growth fields are empty.
        assert!(first_row.ends_with(",,"), "got: {first_row}");
    }

    #[test]
    fn model_names_with_commas_are_quoted() {
        assert_eq!(csv_field("X5"), "X5");
        assert_eq!(csv_field("Gran Coupe, M"), "\"Gran Coupe, M\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn elasticity_table_lists_classification() {
        let rendered = render_elasticity(&sample_metrics());
        assert!(rendered.starts_with("model,elasticity,demand"));
        for line in rendered.lines().skip(1) {
            assert!(
                line.contains(",elastic,") || line.contains(",inelastic,"),
                "got: {line}"
            );
        }
    }
}
