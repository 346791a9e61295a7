//! Best-effort recovery of the group list from free-form model output.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::ResponseParseError;
use crate::models::bundle::ExtractionGroup;

lazy_static! {
    // Greedy: first '[' through the last ']' anywhere in the answer. This is
    // a text scan, not a bracket-balancing parser.
    static ref JSON_ARRAY_SPAN: Regex = Regex::new(r"(?s)\[.*\]").unwrap();
}

/// One record as the model writes it.
#[derive(Debug, Deserialize)]
struct RawGroup {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    codes: Option<Vec<RawCode>>,
}

/// Models occasionally emit purely numeric codes as JSON numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCode {
    Text(String),
    Number(serde_json::Number),
}

impl RawCode {
    fn into_string(self) -> String {
        match self {
            RawCode::Text(s) => s,
            RawCode::Number(n) => n.to_string(),
        }
    }
}

/// Locate the bracketed span in a model answer.
pub fn find_json_array(text: &str) -> Option<&str> {
    JSON_ARRAY_SPAN.find(text).map(|m| m.as_str())
}

/// Parse a model answer into groups.
///
/// Records without a name are labelled `Bağ <n>` by position; records
/// without codes become empty groups.
pub fn parse_groups(text: &str) -> Result<Vec<ExtractionGroup>, ResponseParseError> {
    let span = find_json_array(text.trim()).ok_or(ResponseParseError::NoJsonArray)?;
    let raw: Vec<RawGroup> = serde_json::from_str(span)?;

    let groups = raw
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let name = group.name.unwrap_or_else(|| format!("Bağ {}", i + 1));
            let codes = group
                .codes
                .unwrap_or_default()
                .into_iter()
                .map(RawCode::into_string)
                .collect();
            ExtractionGroup::new(name, codes)
        })
        .collect();

    Ok(groups)
}
