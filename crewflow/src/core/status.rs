//! Stage status enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// The model output was used.
    Completed,
    /// The model was called and failed; fallback text was used.
    Degraded,
    /// The model was never called; synthesized text was used.
    Skipped,
    /// The model failed and the pipeline aborted.
    Failed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Degraded => write!(f, "degraded"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl StageStatus {
    /// Returns true if the status indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_status_display() {
        assert_eq!(StageStatus::Completed.to_string(), "completed");
        assert_eq!(StageStatus::Skipped.to_string(), "skipped");
        assert_eq!(StageStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_only_completed_is_success() {
        assert!(StageStatus::Completed.is_success());
        assert!(!StageStatus::Degraded.is_success());
        assert!(!StageStatus::Skipped.is_success());
    }

    #[test]
    fn test_stage_status_serialize() {
        let json = serde_json::to_string(&StageStatus::Degraded).unwrap();
        assert_eq!(json, r#""degraded""#);
    }
}
