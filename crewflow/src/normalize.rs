//! Output normalization for raw model text.
//!
//! Two jobs, both string-level and both best-effort:
//!
//! - replacing the agent runtime's empty-answer sentinel (and blank output)
//!   with a stage's fixed phrases
//! - digging JSON out of markdown fences so it can be shown as structure
//!
//! Nothing here ever fails; the worst case is the raw text coming back
//! untouched.

use crate::stages::StagePlaceholders;
use serde::Serialize;

/// Phrase the agent runtime emits when it produced no real answer.
pub const SENTINEL_PHRASE: &str = "Thought: I now can give a great answer";

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Returns true if `raw` is nothing but the sentinel phrase.
#[must_use]
pub fn is_sentinel(raw: &str) -> bool {
    raw.trim() == SENTINEL_PHRASE
}

/// Applies the sentinel and empty-output substitutions for one stage.
#[must_use]
pub fn resolve_output(raw: String, placeholders: &StagePlaceholders) -> String {
    if is_sentinel(&raw) {
        placeholders.on_sentinel.to_string()
    } else if raw.trim().is_empty() {
        placeholders.on_empty.to_string()
    } else {
        raw
    }
}

/// A display-ready stage value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayValue {
    /// The text held parseable JSON.
    Structured(serde_json::Value),
    /// Plain text, exactly as produced.
    Text(String),
}

impl DisplayValue {
    /// Returns true if JSON was recovered.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// Returns the JSON object, if the value is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        match self {
            Self::Structured(value) => value.as_object(),
            Self::Text(_) => None,
        }
    }

    /// Gets a top-level field of a JSON object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Returns the plain text, if the value is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Structured(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    /// Renders the value for a text report: pretty JSON or the raw text.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        match self {
            Self::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Text(text) => text.clone(),
        }
    }
}

/// Returns the text between the first `opening` marker and the next fence.
///
/// An unterminated fence runs to the end of the input.
fn fenced_interior<'a>(raw: &'a str, opening: &str) -> Option<&'a str> {
    let start = raw.find(opening)? + opening.len();
    let rest = &raw[start..];
    let end = rest.find(FENCE).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn parse_json(candidate: &str) -> Option<serde_json::Value> {
    serde_json::from_str(candidate).ok()
}

/// Best-effort JSON recovery from model output.
///
/// Tries, in order: the body of a ```` ```json ```` fence, the body of any
/// fence, then the whole trimmed string. Falls back to the raw text.
#[must_use]
pub fn parse_json_safely(raw: &str) -> DisplayValue {
    let attempts = [
        fenced_interior(raw, JSON_FENCE),
        fenced_interior(raw, FENCE),
        Some(raw.trim()),
    ];

    attempts
        .into_iter()
        .flatten()
        .find_map(parse_json)
        .map_or_else(|| DisplayValue::Text(raw.to_string()), DisplayValue::Structured)
}
