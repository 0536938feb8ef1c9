//! Narrative report generation.
//!
//! The generator is modeled as a capability: given the analysis context,
//! return report prose or fail. Two implementations exist:
//!
//! - `OpenAiNarrative`: an OpenAI-compatible chat-completions client
//! - `MockNarrative`: a deterministic template built from the same metrics
//!
//! Configuration selects the implementation; any live-service failure falls
//! back to the mock, so report generation never fails the run.

pub mod openai;

use crate::config::NarrativeConfig;
use crate::domain::{Demand, Headline, MetricsBundle};
use crate::error::AppError;
use crate::report::{SECTION_HEADINGS, fmt_pct};

/// "Given a summary, return prose, or fail."
pub trait NarrativeService {
    fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

/// Pick the service implementation for this run's configuration.
pub fn select_service(
    config: &NarrativeConfig,
    metrics: &MetricsBundle,
) -> Box<dyn NarrativeService> {
    if config.use_mock() {
        Box::new(MockNarrative::new(metrics))
    } else {
        Box::new(openai::OpenAiNarrative::new(config.clone()))
    }
}

/// Generate the report text, falling back to the mock on service failure.
pub fn generate_report(
    config: &NarrativeConfig,
    metrics: &MetricsBundle,
    context: &str,
) -> String {
    let prompt = build_prompt(context);
    match select_service(config, metrics).generate(&prompt) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("narrative service failed ({err}); falling back to the mock report");
            MockNarrative::new(metrics).render()
        }
    }
}

/// Build the instruction prompt around the analysis context.
pub fn build_prompt(context: &str) -> String {
    let mut out = String::new();
    out.push_str(
        "You are a senior business analyst for an automotive sales division. \
         You have been provided with a sales data analysis covering trends, \
         price elasticity, and model performance.\n\n\
         Based on the following analysis data, write an executive report that \
         highlights key findings, surfaces patterns that are not obvious from \
         the raw numbers, and gives strategic pricing and portfolio \
         recommendations.\n\nANALYSIS DATA:\n",
    );
    out.push_str(context);
    out.push_str("\n\nStructure the report with exactly these sections:\n");
    for heading in SECTION_HEADINGS {
        out.push_str(&format!("- {heading}\n"));
    }
    out.push_str("\nWrite in a professional, concise style suitable for C-level executives.\n");
    out
}

/// Deterministic templated report used when no credentials are configured or
/// the live service fails. Covers the same five sections as the service.
pub struct MockNarrative {
    headline: Headline,
    n_elastic: usize,
    n_inelastic: usize,
}

impl MockNarrative {
    pub fn new(metrics: &MetricsBundle) -> Self {
        Self {
            headline: Headline::from_metrics(metrics),
            n_elastic: metrics
                .elasticity
                .iter()
                .filter(|e| e.demand == Demand::Elastic)
                .count(),
            n_inelastic: metrics
                .elasticity
                .iter()
                .filter(|e| e.demand == Demand::Inelastic)
                .count(),
        }
    }

    /// Render the template. Infallible, unlike the trait method.
    pub fn render(&self) -> String {
        let growth = fmt_pct(self.headline.avg_yoy_units_growth);
        let momentum = match self.headline.avg_yoy_units_growth {
            Some(g) if g > 0.0 => "positive",
            Some(_) => "declining",
            None => "not yet measurable",
        };
        let best = &self.headline.best_selling_model;

        let mut out = String::from("SALES ANALYSIS - EXECUTIVE REPORT\n");
        out.push_str("=================================\n");

        out.push_str(&section(SECTION_HEADINGS[0]));
        out.push_str(&format!(
            "This report analyzes sales performance across the model portfolio. \
             The analysis indicates an average year-over-year sales growth of {growth}, \
             with notable variation across model segments.\n"
        ));

        out.push_str(&section(SECTION_HEADINGS[1]));
        out.push_str(&format!(
            "1. Sales momentum is {momentum} (average YoY growth: {growth}).\n\
             2. {best} is the top performer by units sold, showing consistent demand.\n\
             3. Elasticity analysis classifies {} model(s) as elastic and {} as \
             inelastic, indicating room for differentiated pricing.\n",
            self.n_elastic, self.n_inelastic
        ));

        out.push_str(&section(SECTION_HEADINGS[2]));
        out.push_str(
            "1. Monthly trends reveal cyclical patterns useful for inventory and \
             promotion timing.\n\
             2. Models with elastic demand respond disproportionately to price \
             changes; volume can be bought with targeted discounts.\n\
             3. Revenue concentration in the top models suggests both a strength \
             and a diversification risk.\n",
        );

        out.push_str(&section(SECTION_HEADINGS[3]));
        out.push_str(&format!(
            "1. Keep investment focused on {best} while developing growth segments.\n\
             2. Use dynamic pricing on elastic models; hold premium positioning on \
             inelastic ones.\n\
             3. Align production planning with the observed seasonal demand cycle.\n"
        ));

        out.push_str(&section(SECTION_HEADINGS[4]));
        out.push_str(
            "The portfolio shows solid fundamentals with clear optimization \
             opportunities. Applying the elasticity insights while protecting the \
             strongest models balances near-term revenue against long-term brand \
             value.\n",
        );

        out.push_str("\n---\nReport generated from the computed metrics bundle.\n");
        out
    }
}

impl NarrativeService for MockNarrative {
    fn generate(&self, _prompt: &str) -> Result<String, AppError> {
        Ok(self.render())
    }
}

fn section(heading: &str) -> String {
    format!("\n{heading}\n{}\n", "-".repeat(heading.len()))
}
