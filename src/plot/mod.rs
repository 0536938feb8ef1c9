//! Chart rendering with Plotters.
//!
//! We render to SVG so chart generation stays free of native font/bitmap
//! dependencies, and keep this module a thin wrapper: all numbers come
//! straight from the `MetricsBundle`, whose shape is the real contract.
//!
//! Five fixed charts are produced per run:
//! - monthly sales trend (line)
//! - yearly revenue (bars)
//! - model market share (bars, top 10)
//! - revenue vs. sales volume (scatter)
//! - price elasticity by model (signed bars with +/-1 guides)

use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::domain::{Demand, MetricsBundle};
use crate::error::AppError;

/// Fixed chart file names, in render order.
pub const CHART_FILES: [&str; 5] = [
    "monthly_sales_trend.svg",
    "yearly_revenue.svg",
    "model_market_share.svg",
    "revenue_vs_sales.svg",
    "price_elasticity.svg",
];

const CHART_SIZE: (u32, u32) = (1200, 600);
/// Bar charts show at most this many models.
const MAX_BARS: usize = 10;

/// Render all five charts into `charts_dir`.
///
/// An empty performance group here is a programming-contract violation:
/// the pipeline never reaches rendering with zero cleaned records.
pub fn render_all_charts(
    metrics: &MetricsBundle,
    charts_dir: &Path,
) -> Result<Vec<PathBuf>, AppError> {
    if metrics.performance.models.is_empty() {
        return Err(AppError::internal(
            "Metrics bundle has no model performance data; cannot render charts.",
        ));
    }

    let renderers: [fn(&MetricsBundle, &Path) -> Result<(), AppError>; 5] = [
        monthly_sales_trend,
        yearly_revenue,
        model_market_share,
        revenue_vs_sales,
        price_elasticity,
    ];

    let mut paths = Vec::with_capacity(CHART_FILES.len());
    for (name, render) in CHART_FILES.iter().zip(renderers) {
        let path = charts_dir.join(name);
        render(metrics, &path)?;
        paths.push(path);
    }
    Ok(paths)
}

fn monthly_sales_trend(metrics: &MetricsBundle, path: &Path) -> Result<(), AppError> {
    let monthly = &metrics.trends.monthly;
    let labels: Vec<String> = monthly.iter().map(|t| t.label()).collect();
    let y_max = monthly.iter().map(|t| t.units_sold as f64).fold(0.0, f64::max);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Sales Trend", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(index_range(monthly.len()), value_range(y_max))
        .map_err(|e| chart_error(path, e))?;

    let fmt_x = |v: &f64| index_label(&labels, *v);
    chart
        .configure_mesh()
        .x_desc("Period")
        .y_desc("Units Sold")
        .x_labels(labels.len().clamp(1, 12))
        .x_label_formatter(&fmt_x)
        .draw()
        .map_err(|e| chart_error(path, e))?;

    chart
        .draw_series(LineSeries::new(
            monthly
                .iter()
                .enumerate()
                .map(|(i, t)| (i as f64, t.units_sold as f64)),
            &BLUE,
        ))
        .map_err(|e| chart_error(path, e))?;
    chart
        .draw_series(
            monthly
                .iter()
                .enumerate()
                .map(|(i, t)| Circle::new((i as f64, t.units_sold as f64), 3, BLUE.filled())),
        )
        .map_err(|e| chart_error(path, e))?;

    root.present().map_err(|e| chart_error(path, e))
}

fn yearly_revenue(metrics: &MetricsBundle, path: &Path) -> Result<(), AppError> {
    let yearly = &metrics.trends.yearly;
    let labels: Vec<String> = yearly.iter().map(|t| t.year.to_string()).collect();
    let y_max = yearly.iter().map(|t| t.revenue).fold(0.0, f64::max);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Annual Revenue", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(index_range(yearly.len()), value_range(y_max))
        .map_err(|e| chart_error(path, e))?;

    let fmt_x = |v: &f64| index_label(&labels, *v);
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Revenue")
        .x_labels(labels.len().max(1))
        .x_label_formatter(&fmt_x)
        .draw()
        .map_err(|e| chart_error(path, e))?;

    chart
        .draw_series(yearly.iter().enumerate().map(|(i, t)| {
            let x = i as f64;
            Rectangle::new([(x - 0.35, 0.0), (x + 0.35, t.revenue)], BLUE.mix(0.6).filled())
        }))
        .map_err(|e| chart_error(path, e))?;

    root.present().map_err(|e| chart_error(path, e))
}

fn model_market_share(metrics: &MetricsBundle, path: &Path) -> Result<(), AppError> {
    // Models are already sorted by total revenue.
    let top: Vec<_> = metrics.performance.models.iter().take(MAX_BARS).collect();
    let labels: Vec<String> = top.iter().map(|m| m.model.clone()).collect();
    let y_max = top
        .iter()
        .map(|m| m.market_share * 100.0)
        .fold(0.0, f64::max);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Model Market Share (Top 10)", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(index_range(top.len()), value_range(y_max))
        .map_err(|e| chart_error(path, e))?;

    let fmt_x = |v: &f64| index_label(&labels, *v);
    chart
        .configure_mesh()
        .x_desc("Model")
        .y_desc("Market Share (%)")
        .x_labels(labels.len().max(1))
        .x_label_formatter(&fmt_x)
        .draw()
        .map_err(|e| chart_error(path, e))?;

    chart
        .draw_series(top.iter().enumerate().map(|(i, m)| {
            let x = i as f64;
            Rectangle::new(
                [(x - 0.35, 0.0), (x + 0.35, m.market_share * 100.0)],
                RGBColor(255, 127, 80).mix(0.8).filled(),
            )
        }))
        .map_err(|e| chart_error(path, e))?;

    root.present().map_err(|e| chart_error(path, e))
}

fn revenue_vs_sales(metrics: &MetricsBundle, path: &Path) -> Result<(), AppError> {
    let models = &metrics.performance.models;
    let x_max = models.iter().map(|m| m.total_units as f64).fold(0.0, f64::max);
    let y_max = models.iter().map(|m| m.total_revenue).fold(0.0, f64::max);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Model Revenue vs. Sales Volume", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(value_range(x_max), value_range(y_max))
        .map_err(|e| chart_error(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Total Units Sold")
        .y_desc("Total Revenue")
        .draw()
        .map_err(|e| chart_error(path, e))?;

    chart
        .draw_series(models.iter().map(|m| {
            Circle::new(
                (m.total_units as f64, m.total_revenue),
                5,
                GREEN.mix(0.7).filled(),
            )
        }))
        .map_err(|e| chart_error(path, e))?;

    root.present().map_err(|e| chart_error(path, e))
}

fn price_elasticity(metrics: &MetricsBundle, path: &Path) -> Result<(), AppError> {
    // Largest magnitudes first; the elasticity group may legitimately be
    // empty, which still yields a chart with the +/-1 guides only.
    let mut items: Vec<_> = metrics.elasticity.iter().collect();
    items.sort_by(|a, b| {
        b.elasticity
            .abs()
            .partial_cmp(&a.elasticity.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    items.truncate(MAX_BARS);
    let labels: Vec<String> = items.iter().map(|e| e.model.clone()).collect();

    let lo = items.iter().map(|e| e.elasticity).fold(-1.0, f64::min);
    let hi = items.iter().map(|e| e.elasticity).fold(1.0, f64::max);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Price Elasticity by Model (Top 10)", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(index_range(items.len()), padded(lo, hi))
        .map_err(|e| chart_error(path, e))?;

    let fmt_x = |v: &f64| index_label(&labels, *v);
    chart
        .configure_mesh()
        .x_desc("Model")
        .y_desc("Elasticity")
        .x_labels(labels.len().max(1))
        .x_label_formatter(&fmt_x)
        .draw()
        .map_err(|e| chart_error(path, e))?;

    // Guides at the elastic/inelastic boundary and at zero.
    let x_span = index_range(items.len());
    for guide in [-1.0, 0.0, 1.0] {
        chart
            .draw_series(LineSeries::new(
                [(x_span.start, guide), (x_span.end, guide)],
                BLACK.mix(0.4),
            ))
            .map_err(|e| chart_error(path, e))?;
    }

    chart
        .draw_series(items.iter().enumerate().map(|(i, e)| {
            let x = i as f64;
            let color = match e.demand {
                Demand::Elastic => RED.mix(0.7).filled(),
                Demand::Inelastic => BLUE.mix(0.7).filled(),
            };
            Rectangle::new([(x - 0.35, 0.0), (x + 0.35, e.elasticity)], color)
        }))
        .map_err(|e| chart_error(path, e))?;

    root.present().map_err(|e| chart_error(path, e))
}

fn chart_error(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::artifact(format!("Failed to render chart '{}': {e}", path.display()))
}

/// X range for `n` index-positioned items (bars/points at 0, 1, ..).
fn index_range(n: usize) -> Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

/// Y range from zero up to a padded maximum.
fn value_range(max: f64) -> Range<f64> {
    let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };
    0.0..(max * 1.1)
}

/// Padded range for data that spans both signs.
fn padded(lo: f64, hi: f64) -> Range<f64> {
    let (mut lo, mut hi) = (lo, hi);
    if !lo.is_finite() || !hi.is_finite() {
        lo = -1.0;
        hi = 1.0;
    }
    if hi <= lo {
        hi = lo + 1.0;
    }
    let pad = (hi - lo) * 0.1;
    (lo - pad)..(hi + pad)
}

/// Map an index coordinate back to its item label; off-grid ticks are blank.
fn index_label(labels: &[String], v: f64) -> String {
    let i = v.round();
    if (v - i).abs() > 0.25 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}
