//! Bundle data models: extracted groups and the outcome of a fallback run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One named bundle of codes, corresponding to one physical parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionGroup {
    /// Human-readable bundle label, e.g. "1. BAĞ".
    pub name: String,

    /// Barcode payloads in extraction order.
    pub codes: Vec<String>,
}

impl ExtractionGroup {
    /// Create a group from a name and its codes.
    pub fn new(name: impl Into<String>, codes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            codes,
        }
    }

    /// Number of codes in the group.
    pub fn code_count(&self) -> usize {
        self.codes.len()
    }
}

/// Why a single candidate model did not produce a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The model does not exist or is not enabled for this key (HTTP 404).
    ModelUnavailable,
    /// Rate limit or quota exhausted (HTTP 429).
    QuotaExhausted,
    /// Temporary server-side failure (HTTP 500, 502, 503, 504).
    Transient,
    /// The model answered but no parseable group list was found.
    MalformedOutput,
    /// Anything else, including transport failures and auth rejections.
    Other,
}

impl FailureKind {
    /// Classify an HTTP status returned by the API.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::ModelUnavailable,
            429 => Self::QuotaExhausted,
            500 | 502 | 503 | 504 => Self::Transient,
            _ => Self::Other,
        }
    }

    /// Whether this is one of the failures the fallback expects to skip over.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::ModelUnavailable | Self::QuotaExhausted | Self::Transient
        )
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::ModelUnavailable => "model unavailable",
            Self::QuotaExhausted => "quota exhausted",
            Self::Transient => "transient service error",
            Self::MalformedOutput => "malformed output",
            Self::Other => "error",
        };
        f.write_str(text)
    }
}

/// A candidate model that was tried and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptFailure {
    /// Model identifier.
    pub model: String,
    /// Failure class.
    pub kind: FailureKind,
    /// Human-readable reason.
    pub message: String,
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.model, self.kind, self.message)
    }
}

/// Result of running a document through the candidate models.
///
/// Either a model identifier is present together with that model's groups
/// (which may be empty), or no model succeeded and the groups are empty.
/// The constructors are the only way to build one, so the two states cannot
/// be mixed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionOutcome {
    groups: Vec<ExtractionGroup>,
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<AttemptFailure>,
    extracted_at: DateTime<Utc>,
}

impl ExtractionOutcome {
    /// A candidate produced a parseable group list.
    pub fn succeeded(
        model: impl Into<String>,
        groups: Vec<ExtractionGroup>,
        failures: Vec<AttemptFailure>,
    ) -> Self {
        Self {
            groups,
            model: Some(model.into()),
            last_error: None,
            failures,
            extracted_at: Utc::now(),
        }
    }

    /// Every candidate was exhausted.
    pub fn failed(failures: Vec<AttemptFailure>) -> Self {
        // Skippable failures only stand in when nothing else went wrong.
        let last_error = failures
            .iter()
            .rev()
            .find(|f| !f.kind.is_expected())
            .or_else(|| failures.last())
            .map(|f| f.to_string())
            .unwrap_or_else(|| "no candidate models configured".to_string());

        Self {
            groups: Vec::new(),
            model: None,
            last_error: Some(last_error),
            failures,
            extracted_at: Utc::now(),
        }
    }

    /// Extracted groups, in extraction order.
    pub fn groups(&self) -> &[ExtractionGroup] {
        &self.groups
    }

    /// Identifier of the model that produced the groups.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Whether some candidate succeeded.
    pub fn is_success(&self) -> bool {
        self.model.is_some()
    }

    /// Message of the last recorded failure, set only on total failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Candidates skipped before the result (or all of them on failure).
    pub fn failures(&self) -> &[AttemptFailure] {
        &self.failures
    }

    /// When the extraction ran.
    pub fn extracted_at(&self) -> DateTime<Utc> {
        self.extracted_at
    }

    /// Total number of codes across all groups.
    pub fn code_count(&self) -> usize {
        self.groups.iter().map(ExtractionGroup::code_count).sum()
    }

    /// Take ownership of the groups.
    pub fn into_groups(self) -> Vec<ExtractionGroup> {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(model: &str, kind: FailureKind) -> AttemptFailure {
        AttemptFailure {
            model: model.to_string(),
            kind,
            message: format!("{model} failed"),
        }
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(FailureKind::from_status(404), FailureKind::ModelUnavailable);
        assert_eq!(FailureKind::from_status(429), FailureKind::QuotaExhausted);
        assert_eq!(FailureKind::from_status(503), FailureKind::Transient);
        assert_eq!(FailureKind::from_status(403), FailureKind::Other);
        assert!(!FailureKind::MalformedOutput.is_expected());
    }

    #[test]
    fn test_success_with_no_groups_keeps_model() {
        let outcome = ExtractionOutcome::succeeded("gemini-2.0-flash", vec![], vec![]);
        assert!(outcome.is_success());
        assert_eq!(outcome.model(), Some("gemini-2.0-flash"));
        assert!(outcome.groups().is_empty());
        assert_eq!(outcome.last_error(), None);
    }

    #[test]
    fn test_failure_reports_last_error() {
        let outcome = ExtractionOutcome::failed(vec![
            failure("a", FailureKind::ModelUnavailable),
            failure("b", FailureKind::MalformedOutput),
        ]);
        assert!(!outcome.is_success());
        assert!(outcome.groups().is_empty());
        assert_eq!(outcome.last_error(), Some("b (malformed output): b failed"));
    }

    #[test]
    fn test_last_error_prefers_unexpected_failure() {
        let outcome = ExtractionOutcome::failed(vec![
            failure("a", FailureKind::Other),
            failure("b", FailureKind::ModelUnavailable),
            failure("c", FailureKind::QuotaExhausted),
        ]);
        assert_eq!(outcome.last_error(), Some("a (error): a failed"));
    }

    #[test]
    fn test_last_error_falls_back_to_expected_failure() {
        let outcome = ExtractionOutcome::failed(vec![
            failure("a", FailureKind::ModelUnavailable),
            failure("b", FailureKind::Transient),
        ]);
        assert_eq!(outcome.last_error(), Some("b (transient service error): b failed"));
    }

    #[test]
    fn test_failure_without_candidates() {
        let outcome = ExtractionOutcome::failed(vec![]);
        assert_eq!(outcome.last_error(), Some("no candidate models configured"));
    }

    #[test]
    fn test_code_count() {
        let outcome = ExtractionOutcome::succeeded(
            "m",
            vec![
                ExtractionGroup::new("1. BAĞ", vec!["DT123".into(), "DT124".into()]),
                ExtractionGroup::new("2. BAĞ", vec!["EA555".into()]),
            ],
            vec![],
        );
        assert_eq!(outcome.code_count(), 3);
    }
}
