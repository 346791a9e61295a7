//! Code extraction through hosted models.
//!
//! A document is offered to each candidate model in turn; the first answer
//! that contains a parseable group list wins.

mod cache;
mod gemini;
mod orchestrator;
mod parser;
pub mod prompt;

pub use cache::{CacheKey, ExtractionCache};
pub use gemini::{GeminiClient, ModelInfo, GENERATE_CONTENT};
pub use orchestrator::ModelFallbackExtractor;
pub use parser::{find_json_array, parse_groups};
pub use prompt::EXTRACTION_PROMPT;

use std::future::Future;

use crate::document::Document;
use crate::error::ServiceError;

/// A service that answers a prompt about a document with free-form text.
pub trait ContentGenerator {
    /// Ask `model` about `document`; one request, no retries.
    fn generate(
        &self,
        model: &str,
        document: &Document,
        prompt: &str,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}
