//! Sales trends: period totals and growth rates.
//!
//! Records are grouped by `(year, month)` and by year; each period carries
//! total units, total revenue, and the mean of per-record average prices.
//! Growth is the percentage change against the previous period on record and
//! is undefined (`None`) for the first period or when the previous total is
//! zero.

use std::collections::BTreeMap;

use crate::domain::{GrowthSummary, MonthlyTrend, SalesTable, TrendMetrics, YearlyTrend};
use crate::metrics::{mean_defined, pct_change};

#[derive(Default)]
struct PeriodAcc {
    units: u64,
    revenue: f64,
    price_sum: f64,
    n: usize,
}

impl PeriodAcc {
    fn add(&mut self, units: u32, revenue: f64, price: f64) {
        self.units += u64::from(units);
        self.revenue += revenue;
        self.price_sum += price;
        self.n += 1;
    }

    fn avg_price(&self) -> f64 {
        self.price_sum / self.n as f64
    }
}

/// Compute monthly and yearly trends plus the overall growth summary.
pub fn compute(table: &SalesTable) -> TrendMetrics {
    let mut by_month: BTreeMap<(i32, u32), PeriodAcc> = BTreeMap::new();
    let mut by_year: BTreeMap<i32, PeriodAcc> = BTreeMap::new();

    for r in table.records() {
        by_month
            .entry((r.year, r.month))
            .or_default()
            .add(r.units_sold, r.revenue, r.avg_price);
        by_year
            .entry(r.year)
            .or_default()
            .add(r.units_sold, r.revenue, r.avg_price);
    }

    let mut monthly = Vec::with_capacity(by_month.len());
    let mut prev: Option<(u64, f64)> = None;
    for ((year, month), acc) in &by_month {
        let (units_growth_pct, revenue_growth_pct) = growth_vs(prev, acc.units, acc.revenue);
        monthly.push(MonthlyTrend {
            year: *year,
            month: *month,
            units_sold: acc.units,
            revenue: acc.revenue,
            avg_price: acc.avg_price(),
            units_growth_pct,
            revenue_growth_pct,
        });
        prev = Some((acc.units, acc.revenue));
    }

    let mut yearly = Vec::with_capacity(by_year.len());
    let mut prev: Option<(u64, f64)> = None;
    for (year, acc) in &by_year {
        let (units_growth_pct, revenue_growth_pct) = growth_vs(prev, acc.units, acc.revenue);
        yearly.push(YearlyTrend {
            year: *year,
            units_sold: acc.units,
            revenue: acc.revenue,
            avg_price: acc.avg_price(),
            units_growth_pct,
            revenue_growth_pct,
        });
        prev = Some((acc.units, acc.revenue));
    }

    let overall = GrowthSummary {
        avg_monthly_units_growth: mean_defined(monthly.iter().map(|t| t.units_growth_pct)),
        avg_monthly_revenue_growth: mean_defined(monthly.iter().map(|t| t.revenue_growth_pct)),
        avg_yoy_units_growth: mean_defined(yearly.iter().map(|t| t.units_growth_pct)),
        avg_yoy_revenue_growth: mean_defined(yearly.iter().map(|t| t.revenue_growth_pct)),
    };

    TrendMetrics {
        monthly,
        yearly,
        overall,
    }
}

fn growth_vs(prev: Option<(u64, f64)>, units: u64, revenue: f64) -> (Option<f64>, Option<f64>) {
    match prev {
        None => (None, None),
        Some((prev_units, prev_revenue)) => (
            pct_change(prev_units as f64, units as f64),
            pct_change(prev_revenue, revenue),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SalesRecord, SalesTable};
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
    fn monthly_totals_and_growth() {
        // The 3-row scenario: X5 sells 100 then 110, 3 Series sells 200 in
        // January only.
        let table = SalesTable::new(vec![
            record(2022, 1, "X5", 100, 60_000.0),
            record(2022, 2, "X5", 110, 60_000.0),
            record(2022, 1, "3 Series", 200, 40_000.0),
        ]);
        let trends = compute(&table);

        assert_eq!(trends.monthly.len(), 2);
        let jan = &trends.monthly[0];
        assert_eq!((jan.year, jan.month), (2022, 1));
        assert_eq!(jan.units_sold, 300);
        assert_eq!(jan.units_growth_pct, None);
        assert!((jan.revenue - 14_000_000.0).abs() < 1e-6);

        let feb = &trends.monthly[1];
        assert_eq!(feb.units_sold, 110);
        let growth = feb.units_growth_pct.unwrap();
        assert!((growth - (110.0 - 300.0) / 300.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn single_model_february_growth_is_ten_percent() {
        // With only the X5 in the table, February growth is exactly +10%.
        let table = SalesTable::new(vec![
            record(2022, 1, "X5", 100, 60_000.0),
            record(2022, 2, "X5", 110, 60_000.0),
        ]);
        let trends = compute(&table);
        let growth = trends.monthly[1].units_growth_pct.unwrap();
        assert!((growth - 10.0).abs() < 1e-9, "got {growth}");
    }

    #[test]
    fn yearly_growth_spans_years() {
        let table = SalesTable::new(vec![
            record(2021, 6, "X5", 100, 50_000.0),
            record(2021, 7, "X5", 100, 50_000.0),
            record(2022, 6, "X5", 300, 50_000.0),
        ]);
        let trends = compute(&table);

        assert_eq!(trends.yearly.len(), 2);
        assert_eq!(trends.yearly[0].units_growth_pct, None);
        let yoy = trends.yearly[1].units_growth_pct.unwrap();
        assert!((yoy - 50.0).abs() < 1e-9, "got {yoy}");
        assert_eq!(trends.overall.avg_yoy_units_growth, Some(yoy));
    }

    #[test]
    fn single_period_has_no_overall_growth() {
        let table = SalesTable::new(vec![record(2022, 1, "X5", 100, 50_000.0)]);
        let trends = compute(&table);
        assert_eq!(trends.overall.avg_monthly_units_growth, None);
        assert_eq!(trends.overall.avg_yoy_units_growth, None);
    }

    #[test]
    fn months_across_years_stay_chronological() {
        let table = SalesTable::new(vec![
            record(2022, 12, "X5", 100, 50_000.0),
            record(2023, 1, "X5", 110, 50_000.0),
        ]);
        let trends = compute(&table);
        assert_eq!(
            trends.monthly.iter().map(|t| t.label()).collect::<Vec<_>>(),
            vec!["2022-12", "2023-01"]
        );
        assert_eq!(trends.monthly[1].units_growth_pct, Some(10.0));
    }
}
