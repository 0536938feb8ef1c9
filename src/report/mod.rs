//! Report context: the stable summary handed to the narrative generator.
//!
//! `build_context` is the contract with that collaborator: a plain-text
//! digest of the metrics bundle (trend averages, top performers, elasticity
//! split, artifact counts). Keeping it in one place means the live service
//! and the mock always see the same picture of a run.

pub mod format;

use crate::domain::{Demand, MetricsBundle};

/// The five fixed report sections, in order.
pub const SECTION_HEADINGS: [&str; 5] = [
    "Executive Summary",
    "Key Findings",
    "Hidden Patterns & Insights",
    "Strategic Recommendations",
    "Conclusion",
];

/// How many top performers / elasticity examples the context lists.
const TOP_N: usize = 3;

/// Build the analysis context string from the metrics bundle.
pub fn build_context(metrics: &MetricsBundle, n_charts: usize, n_tables: usize) -> String {
    let mut out = String::new();

    let overall = &metrics.trends.overall;
    out.push_str("SALES TRENDS:\n");
    out.push_str(&format!(
        "- Average Year-over-Year Sales Growth: {}\n",
        fmt_pct(overall.avg_yoy_units_growth)
    ));
    out.push_str(&format!(
        "- Average Year-over-Year Revenue Growth: {}\n",
        fmt_pct(overall.avg_yoy_revenue_growth)
    ));
    out.push_str(&format!(
        "- Average Monthly Sales Growth: {}\n",
        fmt_pct(overall.avg_monthly_units_growth)
    ));
    out.push_str(&format!(
        "- Average Monthly Revenue Growth: {}\n",
        fmt_pct(overall.avg_monthly_revenue_growth)
    ));

    let perf = &metrics.performance;
    out.push_str("\nMODEL PERFORMANCE:\n");
    out.push_str(&format!("- Best Selling Model: {}\n", perf.best_selling_model));
    out.push_str(&format!(
        "- Highest Revenue Model: {}\n",
        perf.highest_revenue_model
    ));
    out.push_str(&format!(
        "- Most Stable Model: {}\n",
        perf.most_stable_model.as_deref().unwrap_or("n/a")
    ));

    out.push_str(&format!("\nTOP {TOP_N} PERFORMERS:\n"));
    for (i, m) in perf.models.iter().take(TOP_N).enumerate() {
        out.push_str(&format!(
            "{}. {} - units: {}, revenue: {:.2}, market share: {:.2}%, avg price: {:.2}\n",
            i + 1,
            m.model,
            m.total_units,
            m.total_revenue,
            m.market_share * 100.0,
            m.avg_price,
        ));
    }

    if !metrics.elasticity.is_empty() {
        let elastic: Vec<_> = metrics
            .elasticity
            .iter()
            .filter(|e| e.demand == Demand::Elastic)
            .collect();
        let inelastic: Vec<_> = metrics
            .elasticity
            .iter()
            .filter(|e| e.demand == Demand::Inelastic)
            .collect();

        out.push_str("\nPRICE ELASTICITY INSIGHTS:\n");
        out.push_str(&format!(
            "- Elastic Models ({}): price-sensitive demand\n",
            elastic.len()
        ));
        for e in elastic.iter().take(TOP_N) {
            out.push_str(&format!("  * {}: elasticity = {:.2}\n", e.model, e.elasticity));
        }
        out.push_str(&format!(
            "- Inelastic Models ({}): price-insensitive demand\n",
            inelastic.len()
        ));
        for e in inelastic.iter().take(TOP_N) {
            out.push_str(&format!("  * {}: elasticity = {:.2}\n", e.model, e.elasticity));
        }
    }

    out.push_str(&format!(
        "\nAVAILABLE ARTIFACTS:\n- Charts generated: {n_charts}\n- Tables generated: {n_tables}\n"
    ));

    out
}

/// Format an optional percentage; undefined values print as `n/a`.
pub(crate) fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "n/a".to_string(),
    }
}
