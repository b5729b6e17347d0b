//! Stage invocation shared by both pipelines.
//!
//! The runner calls an agent, applies the sentinel and empty-output
//! substitutions, and announces each stage on the run's event sink.
//! Whether a failure degrades or aborts is left to the caller.

use crate::context::PipelineContext;
use crate::core::{StageName, StageRecord, StageResult, StageStatus};
use crate::errors::ModelError;
use crate::events::EventKind;
use crate::normalize::resolve_output;
use crate::stages::{StageAgent, StagePlaceholders};
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};

/// One model call, before pipeline policy is applied.
#[derive(Debug)]
pub(crate) struct Attempt {
    pub stage: StageName,
    pub started_at: DateTime<Utc>,
    /// Resolved text on success, the untouched client error otherwise.
    pub outcome: Result<String, ModelError>,
}

impl Attempt {
    /// Returns the placeholders for the attempted stage.
    pub fn placeholders(&self) -> StagePlaceholders {
        StagePlaceholders::for_stage(self.stage)
    }

    /// Turns the attempt into a never-failing result.
    ///
    /// A model error becomes `Degraded` with the stage's fallback text.
    pub fn into_result(self) -> (StageResult, DateTime<Utc>) {
        let placeholders = self.placeholders();
        let result = match self.outcome {
            Ok(text) => StageResult::success(text),
            Err(err) => StageResult::degraded(placeholders.on_error, err.to_string()),
        };
        (result, self.started_at)
    }
}

/// Calls `agent` once with `input`.
pub(crate) async fn attempt_stage(
    agent: &StageAgent,
    input: &str,
    ctx: &PipelineContext,
) -> Attempt {
    let stage = agent.name();
    let started_at = Utc::now();

    ctx.emit(
        EventKind::StageStarted,
        json!({
            "stage": stage,
            "input_chars": input.chars().count(),
        }),
    )
    .await;

    let outcome = match agent.invoke(input).await {
        Ok(response) => {
            debug!(
                stage = %stage,
                model = %response.model,
                total_tokens = response.total_tokens(),
                latency_ms = response.latency_ms,
                output_chars = response.content.len(),
                "Stage produced output"
            );
            Ok(resolve_output(response.content, &StagePlaceholders::for_stage(stage)))
        }
        Err(err) => Err(err),
    };

    Attempt {
        stage,
        started_at,
        outcome,
    }
}

/// Announces a finished stage and returns its record unchanged.
pub(crate) async fn announce(ctx: &PipelineContext, record: StageRecord) -> StageRecord {
    let mut data = json!({
        "stage": record.stage,
        "status": record.status,
        "duration_ms": record.duration_ms(),
        "model_invoked": record.model_invoked,
    });
    if let Some(reason) = record.result.as_ref().and_then(StageResult::reason) {
        data["reason"] = json!(reason);
    }
    if let Some(error) = &record.error {
        data["error"] = json!(error);
    }

    match record.status {
        StageStatus::Completed => {
            debug!(stage = %record.stage, duration_ms = record.duration_ms(), "Stage completed");
        }
        StageStatus::Degraded | StageStatus::Skipped => {
            warn!(
                stage = %record.stage,
                status = %record.status,
                reason = record.result.as_ref().and_then(StageResult::reason).unwrap_or_default(),
                "Stage fell back to substitute text"
            );
        }
        StageStatus::Failed => {
            warn!(
                stage = %record.stage,
                error = record.error.as_deref().unwrap_or_default(),
                "Stage failed"
            );
        }
    }

    ctx.emit(record.status.into(), data).await;
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RunIdentity;
    use crate::events::CollectingEventSink;
    use crate::normalize::SENTINEL_PHRASE;
    use crate::testing::ScriptedModelClient;
    use std::sync::Arc;

    fn context(sink: &Arc<CollectingEventSink>) -> PipelineContext {
        PipelineContext::new(RunIdentity::new()).with_event_sink(sink.clone())
    }

    #[tokio::test]
    async fn test_attempt_resolves_sentinel() {
        let sink = Arc::new(CollectingEventSink::new());
        let client = Arc::new(ScriptedModelClient::new().push_text(SENTINEL_PHRASE));
        let agent = StageAgent::for_stage(StageName::MapConditions, client);

        let attempt = attempt_stage(&agent, "symptoms", &context(&sink)).await;
        assert_eq!(attempt.outcome.unwrap(), "Condition mapping completed successfully.");
        assert_eq!(sink.kinds(), vec![EventKind::StageStarted]);
    }

    #[tokio::test]
    async fn test_failed_attempt_degrades_to_fallback() {
        let sink = Arc::new(CollectingEventSink::new());
        let client = Arc::new(ScriptedModelClient::new().push_error(ModelError::other("quota exceeded")));
        let agent = StageAgent::for_stage(StageName::ExtractClauses, client);

        let attempt = attempt_stage(&agent, "text", &context(&sink)).await;
        let (result, _) = attempt.into_result();
        assert_eq!(result.text(), "Clause extraction encountered an error.");
        assert_eq!(result.reason(), Some("quota exceeded"));
    }

    #[tokio::test]
    async fn test_announce_emits_status_event() {
        let sink = Arc::new(CollectingEventSink::new());
        let ctx = context(&sink);
        let record = StageRecord::finished(
            StageName::SuggestRevisions,
            Utc::now(),
            StageResult::degraded("generic", "risk assessment unavailable"),
            false,
        );

        let record = announce(&ctx, record).await;
        assert_eq!(record.status, StageStatus::Skipped);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.kind, EventKind::StageFinished(StageStatus::Skipped));
        assert_eq!(event.stage(), Some(StageName::SuggestRevisions));
        assert_eq!(event.data["reason"], "risk assessment unavailable");
        assert_eq!(event.data["model_invoked"], false);
        assert_eq!(event.pipeline_run_id, ctx.run_id().pipeline_run_id);
    }
}
