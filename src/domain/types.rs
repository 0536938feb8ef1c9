//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built once during ingest and read everywhere else
//! - exported to CSV tables
//! - summarized for the narrative report
//!
//! `SalesTable` and `MetricsBundle` are immutable after construction: ingest
//! produces the table once, the metrics stage derives the bundle once, and
//! both renderer and narrative generator only read them.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// A single validated sales observation plus derived features.
///
/// Invariants (enforced during cleaning, assumed everywhere else):
/// `units_sold > 0`, `avg_price > 0`, `revenue == units_sold * avg_price`.
#[derive(Debug, Clone, Serialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub model: String,
    pub units_sold: u32,
    pub avg_price: f64,
    /// Derived: `units_sold * avg_price`.
    pub revenue: f64,
    pub year: i32,
    pub month: u32,
    /// Calendar quarter, 1..=4.
    pub quarter: u32,
}

impl SalesRecord {
    /// Derive the computed features from an already-validated row.
    ///
    /// This is a pure, total function over valid inputs: callers must have
    /// checked date parseability and positivity before constructing a record.
    pub fn new(date: NaiveDate, model: String, units_sold: u32, avg_price: f64) -> Self {
        Self {
            revenue: units_sold as f64 * avg_price,
            year: date.year(),
            month: date.month(),
            quarter: (date.month() - 1) / 3 + 1,
            date,
            model,
            units_sold,
            avg_price,
        }
    }
}

/// Cleaned, deduplicated sales data, ordered by `(date, model)`.
///
/// Never mutated after ingest completes.
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    /// Build a table from cleaned records, establishing the canonical order.
    pub fn new(mut records: Vec<SalesRecord>) -> Self {
        records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.model.cmp(&b.model)));
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// High-level stats for the run summary. `None` for an empty table.
    pub fn summary(&self) -> Option<DataSummary> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        let models: HashSet<&str> = self.records.iter().map(|r| r.model.as_str()).collect();
        let total_units: u64 = self.records.iter().map(|r| u64::from(r.units_sold)).sum();
        let total_revenue: f64 = self.records.iter().map(|r| r.revenue).sum();
        let mean_price =
            self.records.iter().map(|r| r.avg_price).sum::<f64>() / self.records.len() as f64;

        Some(DataSummary {
            rows: self.records.len(),
            date_start: first.date,
            date_end: last.date,
            distinct_models: models.len(),
            total_units,
            total_revenue,
            mean_price,
        })
    }
}

/// Summary stats about the cleaned table.
#[derive(Debug, Clone)]
pub struct DataSummary {
    pub rows: usize,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub distinct_models: usize,
    pub total_units: u64,
    pub total_revenue: f64,
    pub mean_price: f64,
}

/// All computed metric groups. Immutable once produced; consumed by both the
/// artifact renderer and the narrative generator.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsBundle {
    pub trends: TrendMetrics,
    pub elasticity: Vec<ModelElasticity>,
    pub performance: PerformanceMetrics,
}

/// Growth trends by calendar period.
#[derive(Debug, Clone, Serialize)]
pub struct TrendMetrics {
    /// One row per `(year, month)` with data, chronological.
    pub monthly: Vec<MonthlyTrend>,
    /// One row per year with data, chronological.
    pub yearly: Vec<YearlyTrend>,
    pub overall: GrowthSummary,
}

/// One `(year, month)` aggregate with growth vs the previous month on record.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub units_sold: u64,
    pub revenue: f64,
    /// Mean of per-record average prices in the period.
    pub avg_price: f64,
    /// `None` for the first period or when the previous total is zero.
    pub units_growth_pct: Option<f64>,
    pub revenue_growth_pct: Option<f64>,
}

impl MonthlyTrend {
    /// Period label for tables and chart axes, e.g. `2022-03`.
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// One yearly aggregate with year-over-year growth.
#[derive(Debug, Clone, Serialize)]
pub struct YearlyTrend {
    pub year: i32,
    pub units_sold: u64,
    pub revenue: f64,
    pub avg_price: f64,
    pub units_growth_pct: Option<f64>,
    pub revenue_growth_pct: Option<f64>,
}

/// Averages over the defined growth values (undefined values are skipped,
/// and `None` means no growth value was defined at all).
#[derive(Debug, Clone, Serialize)]
pub struct GrowthSummary {
    pub avg_monthly_units_growth: Option<f64>,
    pub avg_monthly_revenue_growth: Option<f64>,
    pub avg_yoy_units_growth: Option<f64>,
    pub avg_yoy_revenue_growth: Option<f64>,
}

/// Demand classification from price elasticity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Demand {
    Elastic,
    Inelastic,
}

impl Demand {
    /// `Elastic` only when the magnitude strictly exceeds 1; a magnitude of
    /// exactly 1.0 is `Inelastic`.
    pub fn classify(elasticity: f64) -> Self {
        if elasticity.abs() > 1.0 {
            Demand::Elastic
        } else {
            Demand::Inelastic
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Demand::Elastic => "elastic",
            Demand::Inelastic => "inelastic",
        }
    }
}

/// Average price elasticity of demand for one model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelElasticity {
    pub model: String,
    pub elasticity: f64,
    pub demand: Demand,
    pub avg_price: f64,
    pub avg_units: f64,
    /// Number of consecutive-period pairs the average is taken over.
    pub n_obs: usize,
}

/// Aggregate performance for one model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelPerformance {
    pub model: String,
    pub total_units: u64,
    /// Mean monthly units sold.
    pub avg_units: f64,
    /// Sample standard deviation of monthly units; `None` with < 2 months.
    pub units_std: Option<f64>,
    pub total_revenue: f64,
    pub avg_revenue: f64,
    pub avg_price: f64,
    /// Fraction of total revenue across all models; shares sum to 1.0.
    pub market_share: f64,
    /// Coefficient of variation of monthly units (std / mean).
    /// Lower means steadier demand.
    pub sales_cv: Option<f64>,
    /// 1 = highest total revenue.
    pub revenue_rank: usize,
}

/// Performance across the whole model line-up.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMetrics {
    /// Sorted by total revenue, descending.
    pub models: Vec<ModelPerformance>,
    /// Highest total units sold.
    pub best_selling_model: String,
    /// Highest total revenue.
    pub highest_revenue_model: String,
    /// Lowest defined coefficient of variation.
    pub most_stable_model: Option<String>,
}

/// Headline scalars surfaced in the run summary and the mock report.
#[derive(Debug, Clone)]
pub struct Headline {
    pub best_selling_model: String,
    pub avg_yoy_units_growth: Option<f64>,
}

impl Headline {
    pub fn from_metrics(metrics: &MetricsBundle) -> Self {
        Self {
            best_selling_model: metrics.performance.best_selling_model.clone(),
            avg_yoy_units_growth: metrics.trends.overall.avg_yoy_units_growth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn record_revenue_is_exact_product() {
        let r = SalesRecord::new(date(2022, 1, 1), "X5".to_string(), 100, 60_000.0);
        assert_eq!(r.revenue, 100.0 * 60_000.0);

        let r = SalesRecord::new(date(2023, 7, 15), "i4".to_string(), 37, 51_234.56);
        assert_eq!(r.revenue, 37.0 * 51_234.56);
    }

    #[test]
    fn record_calendar_features() {
        let r = SalesRecord::new(date(2022, 1, 1), "X5".to_string(), 1, 1.0);
        assert_eq!((r.year, r.month, r.quarter), (2022, 1, 1));

        let r = SalesRecord::new(date(2023, 3, 31), "X5".to_string(), 1, 1.0);
        assert_eq!(r.quarter, 1);

        let r = SalesRecord::new(date(2023, 4, 1), "X5".to_string(), 1, 1.0);
        assert_eq!(r.quarter, 2);

        let r = SalesRecord::new(date(2023, 12, 31), "X5".to_string(), 1, 1.0);
        assert_eq!(r.quarter, 4);
    }

    #[test]
    fn table_sorted_by_date_then_model() {
        let table = SalesTable::new(vec![
            SalesRecord::new(date(2022, 2, 1), "X5".to_string(), 1, 1.0),
            SalesRecord::new(date(2022, 1, 1), "X5".to_string(), 1, 1.0),
            SalesRecord::new(date(2022, 1, 1), "3 Series".to_string(), 1, 1.0),
        ]);
        let keys: Vec<(NaiveDate, &str)> = table
            .records()
            .iter()
            .map(|r| (r.date, r.model.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (date(2022, 1, 1), "3 Series"),
                (date(2022, 1, 1), "X5"),
                (date(2022, 2, 1), "X5"),
            ]
        );
    }

    #[test]
    fn table_summary_aggregates() {
        let table = SalesTable::new(vec![
            SalesRecord::new(date(2022, 1, 1), "X5".to_string(), 100, 60_000.0),
            SalesRecord::new(date(2022, 2, 1), "3 Series".to_string(), 200, 40_000.0),
        ]);
        let summary = table.summary().unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.distinct_models, 2);
        assert_eq!(summary.total_units, 300);
        assert!((summary.total_revenue - 14_000_000.0).abs() < 1e-6);
        assert_eq!(summary.date_start, date(2022, 1, 1));
        assert_eq!(summary.date_end, date(2022, 2, 1));
    }

    #[test]
    fn empty_table_has_no_summary() {
        assert!(SalesTable::default().summary().is_none());
    }

    #[test]
    fn elasticity_boundary_is_inelastic() {
        assert_eq!(Demand::classify(1.0), Demand::Inelastic);
        assert_eq!(Demand::classify(-1.0), Demand::Inelastic);
        assert_eq!(Demand::classify(1.000001), Demand::Elastic);
        assert_eq!(Demand::classify(-2.5), Demand::Elastic);
        assert_eq!(Demand::classify(0.3), Demand::Inelastic);
    }
}
