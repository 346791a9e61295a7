//! Subcommands and the helpers they share.

pub mod archive;
pub mod config;
pub mod extract;
pub mod models;
pub mod render;
pub mod session;

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use barkod_core::models::bundle::ExtractionOutcome;
use barkod_core::{BarkodConfig, Document, GeminiClient, ModelFallbackExtractor};

/// Build the fallback extractor from configuration and the API key in the
/// environment. A missing key aborts before any model is called.
pub fn build_extractor(config: &BarkodConfig) -> anyhow::Result<ModelFallbackExtractor<GeminiClient>> {
    let client = GeminiClient::from_env(&config.extraction)?;
    Ok(ModelFallbackExtractor::new(
        client,
        config.extraction.models.clone(),
    ))
}

/// Run the extractor with a spinner on stderr.
pub async fn extract_with_spinner(
    extractor: &ModelFallbackExtractor<GeminiClient>,
    document: &Document,
) -> anyhow::Result<ExtractionOutcome> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!(
        "Analyzing with {} candidate models...",
        extractor.models().len()
    ));
    pb.enable_steady_tick(Duration::from_millis(100));

    let outcome = extractor.extract(document).await;

    pb.finish_and_clear();
    Ok(outcome)
}

/// Print the result line shown after an extraction.
pub fn report_outcome(outcome: &ExtractionOutcome) {
    match outcome.model() {
        Some(model) if outcome.groups().is_empty() => {
            eprintln!("{} No labels found (model: {})", style("⚠").yellow(), model);
        }
        Some(model) => {
            eprintln!(
                "{} Found {} barcodes in {} bundles (model: {})",
                style("✓").green(),
                outcome.code_count(),
                outcome.groups().len(),
                style(model).bold()
            );
        }
        None => {
            eprintln!(
                "{} No model produced a result. Last error: {}",
                style("✗").red(),
                outcome.last_error().unwrap_or_default()
            );
        }
    }

    for failure in outcome.failures() {
        debug!("Skipped {}", failure);
    }
}
