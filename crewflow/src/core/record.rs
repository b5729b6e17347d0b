//! Timed record of one executed stage.

use super::{StageName, StageResult, StageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened when a stage ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    /// Stage name.
    pub stage: StageName,
    /// How the stage ended.
    pub status: StageStatus,
    /// The stage outcome; absent when the stage failed outright.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<StageResult>,
    /// Error message if the stage failed outright.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether the model was called.
    pub model_invoked: bool,
    /// When the stage started.
    pub started_at: DateTime<Utc>,
    /// When the stage ended.
    pub ended_at: DateTime<Utc>,
}

impl StageRecord {
    /// Records a stage that resolved to some text.
    ///
    /// A degraded result is reported as [`StageStatus::Skipped`] when the
    /// model was never called.
    #[must_use]
    pub fn finished(
        stage: StageName,
        started_at: DateTime<Utc>,
        result: StageResult,
        model_invoked: bool,
    ) -> Self {
        let status = match (&result, model_invoked) {
            (StageResult::Success { .. }, _) => StageStatus::Completed,
            (StageResult::Degraded { .. }, true) => StageStatus::Degraded,
            (StageResult::Degraded { .. }, false) => StageStatus::Skipped,
        };

        Self {
            stage,
            status,
            result: Some(result),
            error: None,
            model_invoked,
            started_at,
            ended_at: Utc::now(),
        }
    }

    /// Records a stage whose failure aborted the pipeline.
    #[must_use]
    pub fn failed(stage: StageName, started_at: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Failed,
            result: None,
            error: Some(error.into()),
            model_invoked: true,
            started_at,
            ended_at: Utc::now(),
        }
    }

    /// Returns the stage text, if the stage resolved to any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.result.as_ref().map(StageResult::text)
    }

    /// Returns the duration in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_ms(&self) -> f64 {
        (self.ended_at - self.started_at).num_milliseconds() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_success() {
        let record = StageRecord::finished(
            StageName::ExtractClauses,
            Utc::now(),
            StageResult::success("clauses"),
            true,
        );
        assert_eq!(record.status, StageStatus::Completed);
        assert_eq!(record.text(), Some("clauses"));
    }

    #[test]
    fn test_finished_degraded_vs_skipped() {
        let degraded = StageRecord::finished(
            StageName::AssessRisk,
            Utc::now(),
            StageResult::degraded("fallback", "boom"),
            true,
        );
        assert_eq!(degraded.status, StageStatus::Degraded);

        let skipped = StageRecord::finished(
            StageName::SuggestRevisions,
            Utc::now(),
            StageResult::degraded("generic", "risk assessment unavailable"),
            false,
        );
        assert_eq!(skipped.status, StageStatus::Skipped);
        assert!(!skipped.model_invoked);
    }

    #[test]
    fn test_failed() {
        let record = StageRecord::failed(StageName::InterpretSymptoms, Utc::now(), "quota");
        assert_eq!(record.status, StageStatus::Failed);
        assert!(record.text().is_none());
        assert_eq!(record.error.as_deref(), Some("quota"));
    }

    #[test]
    fn test_duration() {
        let started = Utc::now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let record = StageRecord::finished(
            StageName::MapConditions,
            started,
            StageResult::success("x"),
            true,
        );
        assert!(record.duration_ms() >= 10.0);
    }
}
