//! Per-model performance: totals, market share, and demand stability.
//!
//! Market share is revenue-based: a model's total revenue divided by total
//! revenue across all models, expressed as a fraction so shares sum to 1.0.
//! Stability is the coefficient of variation of monthly units sold
//! (std / mean across months); it is undefined with fewer than two months.

use std::collections::BTreeMap;

use crate::domain::{ModelPerformance, PerformanceMetrics, SalesTable};
use crate::metrics::sample_std;

#[derive(Default)]
struct ModelAcc {
    total_units: u64,
    total_revenue: f64,
    price_sum: f64,
    n: usize,
    monthly_units: BTreeMap<(i32, u32), u64>,
}

/// Aggregate performance per model and pick the headline models.
pub fn compute(table: &SalesTable) -> PerformanceMetrics {
    let mut by_model: BTreeMap<&str, ModelAcc> = BTreeMap::new();
    for r in table.records() {
        let acc = by_model.entry(r.model.as_str()).or_default();
        acc.total_units += u64::from(r.units_sold);
        acc.total_revenue += r.revenue;
        acc.price_sum += r.avg_price;
        acc.n += 1;
        *acc.monthly_units.entry((r.year, r.month)).or_default() += u64::from(r.units_sold);
    }

    let total_revenue: f64 = by_model.values().map(|acc| acc.total_revenue).sum();

    let mut models: Vec<ModelPerformance> = by_model
        .into_iter()
        .map(|(model, acc)| {
            let monthly: Vec<f64> = acc.monthly_units.values().map(|&u| u as f64).collect();
            let avg_units = monthly.iter().sum::<f64>() / monthly.len() as f64;
            let units_std = sample_std(&monthly);
            // avg_units > 0 is guaranteed by the cleaning-stage positivity
            // invariant, so the CV denominator is never zero.
            let sales_cv = units_std.map(|std| std / avg_units);

            ModelPerformance {
                model: model.to_string(),
                total_units: acc.total_units,
                avg_units,
                units_std,
                avg_revenue: acc.total_revenue / acc.n as f64,
                avg_price: acc.price_sum / acc.n as f64,
                market_share: if total_revenue > 0.0 {
                    acc.total_revenue / total_revenue
                } else {
                    0.0
                },
                total_revenue: acc.total_revenue,
                sales_cv,
                revenue_rank: 0,
            }
        })
        .collect();

    // Rank by total revenue, highest first; model name breaks ties so the
    // ordering is deterministic.
    models.sort_by(|a, b| {
        b.total_revenue
            .partial_cmp(&a.total_revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.model.cmp(&b.model))
    });
    for (i, m) in models.iter_mut().enumerate() {
        m.revenue_rank = i + 1;
    }

    let best_selling_model = models
        .iter()
        .max_by_key(|m| m.total_units)
        .map(|m| m.model.clone())
        .unwrap_or_default();
    let highest_revenue_model = models
        .first()
        .map(|m| m.model.clone())
        .unwrap_or_default();
    let most_stable_model = models
        .iter()
        .filter_map(|m| m.sales_cv.map(|cv| (m.model.as_str(), cv)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(model, _)| model.to_string());

    PerformanceMetrics {
        models,
        best_selling_model,
        highest_revenue_model,
        most_stable_model,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRecord;
    use chrono::NaiveDate;

    fn record(y: i32, m: u32, model: &str, units: u32, price: f64) -> SalesRecord {
        SalesRecord::new(
            NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            model.to_string(),
            units,
            price,
        )
    }

    #[test]
    fn january_market_share_matches_worked_example() {
        // 3 Series: 200 x 40000, X5: 100 x 60000 in the same month.
        let table = SalesTable::new(vec![
            record(2022, 1, "X5", 100, 60_000.0),
            record(2022, 1, "3 Series", 200, 40_000.0),
        ]);
        let perf = compute(&table);

        let series3 = perf.models.iter().find(|m| m.model == "3 Series").unwrap();
        let expected = 200.0 * 40_000.0 / (200.0 * 40_000.0 + 100.0 * 60_000.0);
        assert!(
            (series3.market_share - expected).abs() < 1e-9,
            "got {}",
            series3.market_share
        );
        // 57.14% as a percentage.
        assert!((series3.market_share * 100.0 - 57.142857).abs() < 1e-4);
    }

    #[test]
    fn market_shares_sum_to_one() {
        let table = SalesTable::new(vec![
            record(2022, 1, "X5", 100, 60_000.0),
            record(2022, 2, "X5", 110, 61_000.0),
            record(2022, 1, "3 Series", 200, 40_000.0),
            record(2022, 1, "Z4", 17, 73_500.0),
        ]);
        let perf = compute(&table);
        let total: f64 = perf.models.iter().map(|m| m.market_share).sum();
        assert!((total - 1.0).abs() < 1e-9, "got {total}");
    }

    #[test]
    fn best_seller_by_units_can_differ_from_revenue_leader() {
        // 3 Series moves more units; X5 earns more revenue.
        let table = SalesTable::new(vec![
            record(2022, 1, "X5", 100, 90_000.0),
            record(2022, 1, "3 Series", 150, 40_000.0),
        ]);
        let perf = compute(&table);
        assert_eq!(perf.best_selling_model, "3 Series");
        assert_eq!(perf.highest_revenue_model, "X5");
        assert_eq!(perf.models[0].model, "X5");
        assert_eq!(perf.models[0].revenue_rank, 1);
        assert_eq!(perf.models[1].revenue_rank, 2);
    }

    #[test]
    fn stability_needs_two_months() {
        let table = SalesTable::new(vec![
            record(2022, 1, "X5", 100, 60_000.0),
            record(2022, 2, "X5", 100, 60_000.0),
            record(2022, 1, "Z4", 10, 70_000.0),
        ]);
        let perf = compute(&table);

        let x5 = perf.models.iter().find(|m| m.model == "X5").unwrap();
        // Identical months: std 0, CV 0.
        assert_eq!(x5.sales_cv, Some(0.0));

        let z4 = perf.models.iter().find(|m| m.model == "Z4").unwrap();
        assert_eq!(z4.sales_cv, None);

        assert_eq!(perf.most_stable_model.as_deref(), Some("X5"));
    }

    #[test]
    fn monthly_units_merge_same_period_records() {
        // Two records of one model in the same month count as one period.
        let table = SalesTable::new(vec![
            record(2022, 1, "X5", 60, 60_000.0),
            SalesRecord::new(
                NaiveDate::from_ymd_opt(2022, 1, 15).unwrap(),
                "X5".to_string(),
                40,
                60_000.0,
            ),
            record(2022, 2, "X5", 100, 60_000.0),
        ]);
        let perf = compute(&table);
        let x5 = &perf.models[0];
        assert_eq!(x5.total_units, 200);
        assert_eq!(x5.avg_units, 100.0);
        assert_eq!(x5.sales_cv, Some(0.0));
    }
}
