//! Content-addressed memo of extraction outcomes.

use std::collections::HashMap;
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::models::bundle::ExtractionOutcome;

/// Key of one upload: digest of its bytes plus its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    digest: String,
    mime_type: String,
}

impl CacheKey {
    /// Build the key for a document.
    pub fn new(bytes: &[u8], mime_type: &str) -> Self {
        Self {
            digest: hex::encode(Sha256::digest(bytes)),
            mime_type: mime_type.to_string(),
        }
    }

    /// Hex SHA-256 of the document bytes.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

/// Unbounded outcome cache, kept for the lifetime of the process.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    entries: Mutex<HashMap<CacheKey, ExtractionOutcome>>,
}

impl ExtractionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previous outcome.
    pub fn get(&self, key: &CacheKey) -> Option<ExtractionOutcome> {
        self.lock().get(key).cloned()
    }

    /// Remember an outcome.
    pub fn insert(&self, key: CacheKey, outcome: ExtractionOutcome) {
        self.lock().insert(key, outcome);
    }

    /// Number of cached uploads.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, ExtractionOutcome>> {
        // A panic while holding the guard cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
