//! Typed pipeline events.

use crate::core::{StageName, StageStatus};
use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// What happened during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A run accepted its input.
    PipelineStarted,
    /// A run produced its final output.
    PipelineCompleted,
    /// A run stopped at a failed stage.
    PipelineFailed,
    /// A stage is about to call its model.
    StageStarted,
    /// A stage ended with the given status.
    StageFinished(StageStatus),
}

impl EventKind {
    /// Every kind a run can announce.
    pub const ALL: [Self; 8] = [
        Self::PipelineStarted,
        Self::PipelineCompleted,
        Self::PipelineFailed,
        Self::StageStarted,
        Self::StageFinished(StageStatus::Completed),
        Self::StageFinished(StageStatus::Degraded),
        Self::StageFinished(StageStatus::Skipped),
        Self::StageFinished(StageStatus::Failed),
    ];

    /// Dotted name used in logs and serialized events.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PipelineStarted => "pipeline.started",
            Self::PipelineCompleted => "pipeline.completed",
            Self::PipelineFailed => "pipeline.failed",
            Self::StageStarted => "stage.started",
            Self::StageFinished(StageStatus::Completed) => "stage.completed",
            Self::StageFinished(StageStatus::Degraded) => "stage.degraded",
            Self::StageFinished(StageStatus::Skipped) => "stage.skipped",
            Self::StageFinished(StageStatus::Failed) => "stage.failed",
        }
    }

    /// Returns true for kinds that report lost model output.
    #[must_use]
    pub fn is_setback(&self) -> bool {
        matches!(
            self,
            Self::PipelineFailed
                | Self::StageFinished(
                    StageStatus::Degraded | StageStatus::Skipped | StageStatus::Failed
                )
        )
    }
}

impl From<StageStatus> for EventKind {
    fn from(status: StageStatus) -> Self {
        Self::StageFinished(status)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One event announced by a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineEvent {
    /// What happened.
    pub kind: EventKind,
    /// The run that announced it.
    pub pipeline_run_id: Uuid,
    /// Kind-specific fields such as `stage`, `duration_ms` or `error`.
    pub data: serde_json::Value,
}

impl PipelineEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(kind: EventKind, pipeline_run_id: Uuid, data: serde_json::Value) -> Self {
        Self {
            kind,
            pipeline_run_id,
            data,
        }
    }

    /// Returns the stage this event is about, if any.
    #[must_use]
    pub fn stage(&self) -> Option<StageName> {
        self.data
            .get("stage")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
