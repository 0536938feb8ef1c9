//! CSV ingest and cleaning.
//!
//! This module is responsible for turning a raw sales CSV into a clean
//! `SalesTable` that is safe to compute metrics over.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (drop bad rows, but report what happened)
//! - **Deterministic behavior** (stable ordering, first duplicate wins)
//! - **Separation of concerns**: no metrics logic here

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{SalesRecord, SalesTable};
use crate::error::AppError;

/// Columns the input file must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = ["date", "model", "units_sold", "avg_price"];

/// A row-level problem encountered during cleaning.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based line number in the input file (header is line 1).
    pub line: usize,
    pub message: String,
}

/// How many rows each filtering stage removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropCounts {
    /// Unparseable date/numeric fields, empty model name, malformed row.
    pub coercion: usize,
    /// Zero or negative `units_sold` / `avg_price`.
    pub non_positive: usize,
    /// Repeated `(date, model)` key; the first occurrence is kept.
    pub duplicate: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.coercion + self.non_positive + self.duplicate
    }
}

/// Ingest output: the cleaned table plus audit information.
///
/// The drop counts and row errors exist for reporting only; they never
/// affect downstream behavior.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub table: SalesTable,
    pub rows_read: usize,
    pub drops: DropCounts,
    pub row_errors: Vec<RowError>,
}

/// Load and clean a sales CSV from disk.
pub fn load_sales(path: &Path) -> Result<CleanedTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open sales CSV '{}': {e}", path.display()))
    })?;
    read_sales(file)
}

/// Load and clean sales data from any reader.
///
/// This is the testable entry point: tests feed byte slices, the binary
/// feeds an open file.
pub fn read_sales<R: Read>(input: R) -> Result<CleanedTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns = resolve_columns(&headers)?;

    let mut records: Vec<SalesRecord> = Vec::new();
    let mut seen: HashSet<(NaiveDate, String)> = HashSet::new();
    let mut drops = DropCounts::default();
    let mut row_errors: Vec<RowError> = Vec::new();
    let mut rows_read = 0usize;

    for (idx, row) in reader.records().enumerate() {
        // Data starts on line 2; the header occupies line 1.
        let line = idx + 2;
        rows_read += 1;

        let row = match row {
            Ok(row) => row,
            Err(e) => {
                drops.coercion += 1;
                row_errors.push(RowError {
                    line,
                    message: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        let parsed = match parse_row(&row, &columns) {
            Ok(parsed) => parsed,
            Err(message) => {
                drops.coercion += 1;
                row_errors.push(RowError { line, message });
                continue;
            }
        };

        if parsed.units_sold <= 0 || parsed.avg_price <= 0.0 {
            drops.non_positive += 1;
            row_errors.push(RowError {
                line,
                message: format!(
                    "non-positive values (units_sold={}, avg_price={})",
                    parsed.units_sold, parsed.avg_price
                ),
            });
            continue;
        }

        let units_sold = match u32::try_from(parsed.units_sold) {
            Ok(units) => units,
            Err(_) => {
                drops.coercion += 1;
                row_errors.push(RowError {
                    line,
                    message: format!("units_sold out of range: {}", parsed.units_sold),
                });
                continue;
            }
        };

        if !seen.insert((parsed.date, parsed.model.clone())) {
            drops.duplicate += 1;
            row_errors.push(RowError {
                line,
                message: format!("duplicate (date, model) key: {} / {}", parsed.date, parsed.model),
            });
            continue;
        }

        records.push(SalesRecord::new(
            parsed.date,
            parsed.model,
            units_sold,
            parsed.avg_price,
        ));
    }

    Ok(CleanedTable {
        table: SalesTable::new(records),
        rows_read,
        drops,
        row_errors,
    })
}

/// Resolved indices of the required columns.
struct Columns {
    date: usize,
    model: usize,
    units_sold: usize,
    avg_price: usize,
}

/// Validate the header row and resolve column positions.
///
/// Header matching is case-insensitive and trimmed; every missing required
/// column is reported in one error.
fn resolve_columns(headers: &StringRecord) -> Result<Columns, AppError> {
    let map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_ascii_lowercase(), i))
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| !map.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::input(format!(
            "Input is missing required column(s): {}. Expected header: {}.",
            missing.join(", "),
            REQUIRED_COLUMNS.join(",")
        )));
    }

    Ok(Columns {
        date: map["date"],
        model: map["model"],
        units_sold: map["units_sold"],
        avg_price: map["avg_price"],
    })
}

/// A row after type coercion but before value checks.
struct ParsedRow {
    date: NaiveDate,
    model: String,
    units_sold: i64,
    avg_price: f64,
}

fn field<'a>(row: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    row.get(idx).ok_or_else(|| format!("missing field '{name}'"))
}

fn parse_row(row: &StringRecord, columns: &Columns) -> Result<ParsedRow, String> {
    let date_raw = field(row, columns.date, "date")?;
    let date = date_raw
        .parse::<NaiveDate>()
        .map_err(|_| format!("unparseable date '{date_raw}' (expected YYYY-MM-DD)"))?;

    let model = field(row, columns.model, "model")?.to_string();
    if model.is_empty() {
        return Err("empty model name".to_string());
    }

    let units_raw = field(row, columns.units_sold, "units_sold")?;
    let units_sold = units_raw
        .parse::<i64>()
        .map_err(|_| format!("unparseable units_sold '{units_raw}'"))?;

    let price_raw = field(row, columns.avg_price, "avg_price")?;
    let avg_price = price_raw
        .parse::<f64>()
        .map_err(|_| format!("unparseable avg_price '{price_raw}'"))?;
    if !avg_price.is_finite() {
        return Err(format!("non-finite avg_price '{price_raw}'"));
    }

    Ok(ParsedRow {
        date,
        model,
        units_sold,
        avg_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::export::render_cleaned_csv;

    fn clean(csv: &str) -> CleanedTable {
        read_sales(csv.as_bytes()).expect("ingest should succeed")
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = read_sales("date,model,units_sold\n2022-01-01,X5,100\n".as_bytes())
            .expect_err("missing avg_price must fail");
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("avg_price"), "got: {err}");
    }

    #[test]
    fn valid_rows_survive_cleaning() {
        let cleaned = clean(
            "date,model,units_sold,avg_price\n\
             2022-01-01,X5,100,60000\n\
             2022-02-01,X5,110,60000\n\
             2022-01-01,3 Series,200,40000\n",
        );
        assert_eq!(cleaned.rows_read, 3);
        assert_eq!(cleaned.table.len(), 3);
        assert_eq!(cleaned.drops.total(), 0);

        // Revenue is the exact product for every record.
        for r in cleaned.table.records() {
            assert_eq!(r.revenue, f64::from(r.units_sold) * r.avg_price);
        }
    }

    #[test]
    fn bad_types_are_dropped_not_fatal() {
        let cleaned = clean(
            "date,model,units_sold,avg_price\n\
             not-a-date,X5,100,60000\n\
             2022-01-01,X5,many,60000\n\
             2022-02-01,X5,100,cheap\n\
             2022-03-01,,100,60000\n\
             2022-04-01,X5,100,60000\n",
        );
        assert_eq!(cleaned.drops.coercion, 4);
        assert_eq!(cleaned.table.len(), 1);
        assert_eq!(cleaned.row_errors.len(), 4);
        assert_eq!(cleaned.row_errors[0].line, 2);
    }

    #[test]
    fn non_positive_values_are_dropped() {
        let cleaned = clean(
            "date,model,units_sold,avg_price\n\
             2022-01-01,X5,0,60000\n\
             2022-02-01,X5,-5,60000\n\
             2022-03-01,X5,100,0\n\
             2022-04-01,X5,100,-1.5\n\
             2022-05-01,X5,100,60000\n",
        );
        assert_eq!(cleaned.drops.non_positive, 4);
        assert_eq!(cleaned.table.len(), 1);
    }

    #[test]
    fn duplicate_date_model_keeps_first() {
        let cleaned = clean(
            "date,model,units_sold,avg_price\n\
             2022-01-01,X5,100,60000\n\
             2022-01-01,X5,100,60000\n\
             2022-01-01,X5,999,1\n",
        );
        assert_eq!(cleaned.drops.duplicate, 2);
        assert_eq!(cleaned.table.len(), 1);
        assert_eq!(cleaned.table.records()[0].units_sold, 100);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let cleaned = clean("Date,Model,UNITS_SOLD,Avg_Price\n2022-01-01,X5,100,60000\n");
        assert_eq!(cleaned.table.len(), 1);
    }

    #[test]
    fn nan_price_is_a_coercion_error() {
        let cleaned = clean("date,model,units_sold,avg_price\n2022-01-01,X5,100,NaN\n");
        assert_eq!(cleaned.drops.coercion, 1);
        assert!(cleaned.table.is_empty());
    }

    #[test]
    fn cleaning_is_idempotent() {
        let cleaned = clean(
            "date,model,units_sold,avg_price,note\n\
             2022-01-01,X5,100,60123.45,a\n\
             2022-01-01,X5,100,60123.45,dup\n\
             2022-02-01,X5,0,60000,bad\n\
             2022-02-01,3 Series,200,39999.99,b\n",
        );
        assert_eq!(cleaned.table.len(), 2);
        assert_eq!(cleaned.drops.total(), 2);

        // Re-ingesting the exported cleaned CSV drops nothing further.
        let exported = render_cleaned_csv(&cleaned.table);
        let again = read_sales(exported.as_bytes()).unwrap();
        assert_eq!(again.table.len(), cleaned.table.len());
        assert_eq!(again.drops.total(), 0);
        for (a, b) in cleaned.table.records().iter().zip(again.table.records()) {
            assert_eq!(a.date, b.date);
            assert_eq!(a.model, b.model);
            assert_eq!(a.units_sold, b.units_sold);
            assert_eq!(a.avg_price, b.avg_price);
            assert_eq!(a.revenue, b.revenue);
        }
    }
}
