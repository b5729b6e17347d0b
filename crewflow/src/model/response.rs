//! Model response type.

use serde::{Deserialize, Serialize};

/// Text generated by a model, with whatever usage data the host reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The generated text, untouched.
    pub content: String,
    /// Model that answered, as reported by the host.
    #[serde(default)]
    pub model: String,
    /// Prompt tokens billed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u32>,
    /// Completion tokens billed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u32>,
    /// Round-trip time of the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    /// Why generation stopped, e.g. `stop` or `length`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl ModelResponse {
    /// Creates a response carrying only content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: String::new(),
            input_tokens: None,
            output_tokens: None,
            latency_ms: None,
            finish_reason: None,
        }
    }

    /// Returns total tokens.
    #[must_use]
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens.unwrap_or(0) + self.output_tokens.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_tokens() {
        let mut response = ModelResponse::new("ok");
        assert_eq!(response.total_tokens(), 0);

        response.input_tokens = Some(120);
        response.output_tokens = Some(30);
        assert_eq!(response.total_tokens(), 150);
    }
}
