//! Synthetic sales data generation.
//!
//! Produces a raw-input CSV for demos and testing: one row per model per
//! month, with a mild upward trend, a yearly seasonal cycle, and seeded
//! random variation so the same seed always reproduces the same file.

use chrono::NaiveDate;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::{SalesRecord, SalesTable};
use crate::error::AppError;

/// Model line-up: (name, base monthly units, base price).
const LINEUP: [(&str, u32, f64); 11] = [
    ("BMW 3 Series", 850, 42_000.0),
    ("BMW 5 Series", 620, 55_000.0),
    ("BMW 7 Series", 180, 88_000.0),
    ("BMW X1", 480, 38_000.0),
    ("BMW X3", 920, 45_000.0),
    ("BMW X5", 720, 62_000.0),
    ("BMW X7", 280, 76_000.0),
    ("BMW i4", 320, 58_000.0),
    ("BMW iX", 210, 85_000.0),
    ("BMW M3", 150, 72_000.0),
    ("BMW M5", 95, 105_000.0),
];

const START_YEAR: i32 = 2022;
/// Linear volume growth per month offset.
const TREND_PER_MONTH: f64 = 0.01;
/// Peak-to-trough amplitude of the yearly demand cycle.
const SEASONAL_AMPLITUDE: f64 = 0.2;

/// Settings for one generation run.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub months: u32,
    pub seed: u64,
}

/// Generate `months * LINEUP.len()` synthetic records, starting at 2022-01.
pub fn generate_sample(config: &SampleConfig) -> Result<SalesTable, AppError> {
    if config.months == 0 {
        return Err(AppError::input("Sample month count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.months as usize * LINEUP.len());

    for offset in 0..config.months {
        let date = month_start(offset)
            .ok_or_else(|| AppError::internal("Invalid synthetic calendar date."))?;
        let trend = 1.0 + f64::from(offset) * TREND_PER_MONTH;
        let seasonal = 1.0
            + SEASONAL_AMPLITUDE * (std::f64::consts::TAU * f64::from(offset) / 12.0).sin();

        for (model, base_units, base_price) in LINEUP {
            let volume_noise: f64 = rng.gen_range(0.85..=1.15);
            let units = (f64::from(base_units) * trend * seasonal * volume_noise).round() as u32;

            let price_noise: f64 = rng.gen_range(0.95..=1.05);
            // Two decimals so the rendered CSV parses back to the same value.
            let avg_price = (base_price * price_noise * 100.0).round() / 100.0;

            records.push(SalesRecord::new(
                date,
                model.to_string(),
                units.max(1),
                avg_price,
            ));
        }
    }

    Ok(SalesTable::new(records))
}

/// Render the table as a raw-input CSV (the four required columns only).
pub fn render_sample_csv(table: &SalesTable) -> String {
    let mut out = String::from("date,model,units_sold,avg_price\n");
    for r in table.records() {
        out.push_str(&format!(
            "{},{},{},{:.2}\n",
            r.date, r.model, r.units_sold, r.avg_price
        ));
    }
    out
}

/// Write the generated table to `path`, creating parent directories.
pub fn write_sample(path: &std::path::Path, table: &SalesTable) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::artifact(format!(
                "Failed to create sample data directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    std::fs::write(path, render_sample_csv(table)).map_err(|e| {
        AppError::artifact(format!(
            "Failed to write sample data '{}': {e}",
            path.display()
        ))
    })
}

/// First day of the month `offset` months after the start of `START_YEAR`.
fn month_start(offset: u32) -> Option<NaiveDate> {
    let year = START_YEAR + (offset / 12) as i32;
    let month = offset % 12 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}
