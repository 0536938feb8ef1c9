//! Price elasticity of demand per model.
//!
//! For each model, records are walked in chronological order and every pair
//! of consecutive periods contributes `%Δunits / %Δprice`. Pairs where the
//! price did not move carry no elasticity information and are excluded from
//! the average; a model with no usable pair is omitted entirely. Neither
//! case is an error.

use std::collections::BTreeMap;

use crate::domain::{Demand, ModelElasticity, SalesRecord, SalesTable};
use crate::metrics::pct_change;

/// Compute the average elasticity for every model with enough data.
pub fn compute(table: &SalesTable) -> Vec<ModelElasticity> {
    // The table is sorted by (date, model), so per-model groups stay
    // chronological without re-sorting.
    let mut by_model: BTreeMap<&str, Vec<&SalesRecord>> = BTreeMap::new();
    for r in table.records() {
        by_model.entry(r.model.as_str()).or_default().push(r);
    }

    let mut out = Vec::new();
    for (model, records) in by_model {
        if records.len() < 2 {
            continue;
        }

        let mut ratios = Vec::new();
        for pair in records.windows(2) {
            let units_change = pct_change(
                f64::from(pair[0].units_sold),
                f64::from(pair[1].units_sold),
            );
            let price_change = pct_change(pair[0].avg_price, pair[1].avg_price);
            match (units_change, price_change) {
                (Some(dq), Some(dp)) if dp != 0.0 => ratios.push(dq / dp),
                _ => {}
            }
        }
        if ratios.is_empty() {
            continue;
        }

        let elasticity = ratios.iter().sum::<f64>() / ratios.len() as f64;
        let n = records.len() as f64;
        out.push(ModelElasticity {
            model: model.to_string(),
            elasticity,
            demand: Demand::classify(elasticity),
            avg_price: records.iter().map(|r| r.avg_price).sum::<f64>() / n,
            avg_units: records.iter().map(|r| f64::from(r.units_sold)).sum::<f64>() / n,
            n_obs: ratios.len(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(m: u32, model: &str, units: u32, price: f64) -> SalesRecord {
        SalesRecord::new(
            NaiveDate::from_ymd_opt(2022, m, 1).unwrap(),
            model.to_string(),
            units,
            price,
        )
    }

    #[test]
    fn constant_price_yields_no_elasticity() {
        // Units move but the price never does: no usable pair, model omitted.
        let table = SalesTable::new(vec![
            record(1, "X5", 100, 60_000.0),
            record(2, "X5", 110, 60_000.0),
            record(3, "X5", 90, 60_000.0),
        ]);
        assert!(compute(&table).is_empty());
    }

    #[test]
    fn known_elasticity_value() {
        // Price +10%, units -20% => elasticity -2.0 (elastic).
        let table = SalesTable::new(vec![
            record(1, "X5", 100, 50_000.0),
            record(2, "X5", 80, 55_000.0),
        ]);
        let result = compute(&table);
        assert_eq!(result.len(), 1);
        let e = &result[0];
        assert!((e.elasticity - (-2.0)).abs() < 1e-9, "got {}", e.elasticity);
        assert_eq!(e.demand, Demand::Elastic);
        assert_eq!(e.n_obs, 1);
    }

    #[test]
    fn unit_magnitude_is_inelastic() {
        // Price +10%, units -10% => elasticity exactly -1.0: inelastic.
        let table = SalesTable::new(vec![
            record(1, "X5", 100, 50_000.0),
            record(2, "X5", 90, 55_000.0),
        ]);
        let result = compute(&table);
        assert_eq!(result.len(), 1);
        assert!((result[0].elasticity.abs() - 1.0).abs() < 1e-9);
        assert_eq!(result[0].demand, Demand::Inelastic);
    }

    #[test]
    fn zero_price_pairs_are_excluded_from_average() {
        // Second pair has no price move and must not dilute the average.
        let table = SalesTable::new(vec![
            record(1, "X5", 100, 50_000.0),
            record(2, "X5", 80, 55_000.0),
            record(3, "X5", 120, 55_000.0),
        ]);
        let result = compute(&table);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].n_obs, 1);
        assert!((result[0].elasticity - (-2.0)).abs() < 1e-9);
    }

    #[test]
    fn single_record_models_are_skipped() {
        let table = SalesTable::new(vec![
            record(1, "X5", 100, 50_000.0),
            record(2, "X5", 80, 55_000.0),
            record(1, "Z4", 10, 70_000.0),
        ]);
        let result = compute(&table);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].model, "X5");
    }

    #[test]
    fn averages_cover_all_records() {
        let table = SalesTable::new(vec![
            record(1, "X5", 100, 50_000.0),
            record(2, "X5", 80, 60_000.0),
        ]);
        let result = compute(&table);
        assert!((result[0].avg_price - 55_000.0).abs() < 1e-9);
        assert!((result[0].avg_units - 90.0).abs() < 1e-9);
    }
}
