//! Pipeline configuration.
//!
//! There is no ambient global state: one `PipelineConfig` is built up front
//! (CLI arguments + environment) and passed by reference into every stage.
//! This keeps stages pure functions of their inputs and makes partial runs
//! (`salesrep clean`, `salesrep metrics`, ...) trivially consistent with the
//! full run.

use std::path::PathBuf;

use crate::error::AppError;

/// Default chat model when `LLM_MODEL` is not set.
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Everything a full pipeline run needs to know.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Raw sales CSV (columns: date, model, units_sold, avg_price).
    pub input: PathBuf,
    /// Root of the data tree; the cleaned table lands under `<data_dir>/processed`.
    pub data_dir: PathBuf,
    /// Root directory for all generated artifacts (charts, tables, reports).
    pub out_dir: PathBuf,
    pub narrative: NarrativeConfig,
}

/// Settings for the external narrative service.
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    /// Missing key is not an error: it selects the deterministic mock.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Force the mock even when credentials are configured.
    pub force_mock: bool,
}

impl NarrativeConfig {
    /// Read narrative settings from the environment (`.env` supported).
    pub fn from_env(force_mock: bool) -> Self {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let temperature = std::env::var("LLM_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);
        let max_tokens = std::env::var("LLM_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        Self {
            api_key,
            model,
            temperature,
            max_tokens,
            force_mock,
        }
    }

    /// Whether this run uses the mock generator instead of the live service.
    pub fn use_mock(&self) -> bool {
        self.force_mock || self.api_key.is_none()
    }
}

impl PipelineConfig {
    pub fn charts_dir(&self) -> PathBuf {
        self.out_dir.join("charts")
    }

    pub fn tables_dir(&self) -> PathBuf {
        self.out_dir.join("tables")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.out_dir.join("reports")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    pub fn report_path(&self) -> PathBuf {
        self.reports_dir().join("executive_report.txt")
    }

    pub fn cleaned_data_path(&self) -> PathBuf {
        self.processed_dir().join("cleaned_sales_data.csv")
    }

    /// Create every output directory up front so stages can assume they exist.
    pub fn ensure_directories(&self) -> Result<(), AppError> {
        for dir in [
            self.charts_dir(),
            self.tables_dir(),
            self.reports_dir(),
            self.processed_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::artifact(format!(
                    "Failed to create output directory '{}': {e}",
                    dir.display()
                ))
            })?;
        }
        Ok(())
    }
}
