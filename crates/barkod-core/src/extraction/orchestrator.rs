//! Sequential fallback across candidate models.

use tracing::{debug, info, warn};

use super::cache::{CacheKey, ExtractionCache};
use super::parser::parse_groups;
use super::prompt::EXTRACTION_PROMPT;
use super::ContentGenerator;
use crate::document::Document;
use crate::error::ServiceError;
use crate::models::bundle::{AttemptFailure, ExtractionOutcome, FailureKind};

/// Extracts groups by trying each candidate model in order.
///
/// Candidates are called one at a time. The first answer that parses is
/// returned and later candidates are never charged. Every failure, whatever
/// its class, moves on to the next candidate. Outcomes are memoized per
/// upload for the lifetime of the extractor.
pub struct ModelFallbackExtractor<G> {
    generator: G,
    models: Vec<String>,
    prompt: String,
    cache: ExtractionCache,
}

impl<G: ContentGenerator> ModelFallbackExtractor<G> {
    /// Create an extractor over `models`, highest priority first.
    pub fn new(generator: G, models: Vec<String>) -> Self {
        Self {
            generator,
            models,
            prompt: EXTRACTION_PROMPT.to_string(),
            cache: ExtractionCache::new(),
        }
    }

    /// Replace the instruction prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Candidate models in priority order.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// The underlying generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Number of distinct uploads already extracted.
    pub fn cached_uploads(&self) -> usize {
        self.cache.len()
    }

    /// Extract groups from a document, reusing a previous outcome for an
    /// identical upload.
    pub async fn extract(&self, document: &Document) -> ExtractionOutcome {
        let key = CacheKey::new(document.bytes(), document.mime_type());

        if let Some(outcome) = self.cache.get(&key) {
            debug!("Reusing extraction for upload {}", &key.digest()[..12]);
            return outcome;
        }

        let outcome = self.run_candidates(document).await;
        self.cache.insert(key, outcome.clone());
        outcome
    }

    async fn run_candidates(&self, document: &Document) -> ExtractionOutcome {
        let mut failures = Vec::new();

        for model in &self.models {
            debug!("Trying model {}", model);

            let failure = match self.generator.generate(model, document, &self.prompt).await {
                Ok(answer) => match parse_groups(&answer) {
                    Ok(groups) => {
                        info!(
                            "Model {} returned {} groups after {} skipped candidates",
                            model,
                            groups.len(),
                            failures.len()
                        );
                        return ExtractionOutcome::succeeded(model.clone(), groups, failures);
                    }
                    Err(e) => AttemptFailure {
                        model: model.clone(),
                        kind: FailureKind::MalformedOutput,
                        message: e.to_string(),
                    },
                },
                Err(e) => AttemptFailure {
                    model: model.clone(),
                    kind: classify(&e),
                    message: e.to_string(),
                },
            };

            if failure.kind.is_expected() {
                debug!("Skipping {}", failure);
            } else {
                warn!("Skipping {}", failure);
            }
            failures.push(failure);
        }

        let outcome = ExtractionOutcome::failed(failures);
        warn!(
            "No model produced a result; last error: {}",
            outcome.last_error().unwrap_or_default()
        );
        outcome
    }
}

/// Map a service error onto the failure classes the fallback distinguishes.
fn classify(error: &ServiceError) -> FailureKind {
    match error {
        ServiceError::Status { status, .. } => FailureKind::from_status(*status),
        ServiceError::EmptyResponse => FailureKind::MalformedOutput,
        ServiceError::Transport(_) | ServiceError::Decode(_) => FailureKind::Other,
    }
}
