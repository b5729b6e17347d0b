//! Per-stage outcome type.

use serde::{Deserialize, Serialize};

/// The outcome of one stage.
///
/// A stage never aborts the contract pipeline: it either produced text or
/// was replaced by substitute text, and both carry something displayable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageResult {
    /// The model produced usable output.
    Success {
        /// The stage text.
        text: String,
    },
    /// Substitute text stands in for the model's output.
    Degraded {
        /// The substitute text.
        text: String,
        /// Why the stage degraded.
        reason: String,
    },
}

impl StageResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    /// Creates a degraded result.
    #[must_use]
    pub fn degraded(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Degraded {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Returns the displayable text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success { text } | Self::Degraded { text, .. } => text,
        }
    }

    /// Consumes the result, returning its text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Success { text } | Self::Degraded { text, .. } => text,
        }
    }

    /// Returns the degradation reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    /// Returns true if the model output was used.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true if substitute text was used.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        let result = StageResult::success("1. [HIGH RISK] - Liability");
        assert!(result.is_success());
        assert_eq!(result.text(), "1. [HIGH RISK] - Liability");
        assert!(result.reason().is_none());
    }

    #[test]
    fn test_degraded() {
        let result = StageResult::degraded("placeholder", "timeout");
        assert!(result.is_degraded());
        assert_eq!(result.reason(), Some("timeout"));
        assert_eq!(result.into_text(), "placeholder");
    }

    #[test]
    fn test_serialization() {
        let result = StageResult::degraded("x", "y");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"status": "degraded", "text": "x", "reason": "y"}));

        let back: StageResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
