//! The symptom-checker pipeline.

use super::runner::{announce, attempt_stage, Attempt};
use crate::context::{PipelineContext, RunIdentity, SYMPTOM_DESCRIPTION_KEY};
use crate::core::{StageName, StageRecord, StageResult};
use crate::errors::{CrewflowError, ValidationError};
use crate::events::{EventKind, EventSink, NoOpEventSink};
use crate::form::SymptomForm;
use crate::model::ModelClient;
use crate::normalize::{parse_json_safely, DisplayValue};
use crate::stages::StageAgent;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// The three texts a completed symptom check produced, unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomFindings {
    /// Structured reading of the user's description.
    pub structured_symptoms: String,
    /// Areas of concern mapped from the symptoms.
    pub mapped_conditions: String,
    /// Visit summary for a doctor.
    pub doctor_note: String,
}

impl SymptomFindings {
    /// Normalized structured symptoms.
    #[must_use]
    pub fn symptoms(&self) -> DisplayValue {
        parse_json_safely(&self.structured_symptoms)
    }

    /// Normalized mapped conditions.
    #[must_use]
    pub fn conditions(&self) -> DisplayValue {
        parse_json_safely(&self.mapped_conditions)
    }

    /// Normalized doctor note.
    #[must_use]
    pub fn note(&self) -> DisplayValue {
        parse_json_safely(&self.doctor_note)
    }
}

/// Outcome of a symptom check: all three texts or a single error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymptomCheck {
    /// Every stage produced output.
    Completed(SymptomFindings),
    /// A stage failed and the run stopped there.
    Failed {
        /// The failing stage's error message.
        error: String,
    },
}

impl SymptomCheck {
    /// Returns true if the check completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Returns the findings of a completed check.
    #[must_use]
    pub fn findings(&self) -> Option<&SymptomFindings> {
        match self {
            Self::Completed(findings) => Some(findings),
            Self::Failed { .. } => None,
        }
    }

    /// Returns the error of a failed check.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Completed(_) => None,
            Self::Failed { error } => Some(error),
        }
    }
}

impl Serialize for SymptomCheck {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Completed(findings) => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("structured_symptoms", &findings.structured_symptoms)?;
                map.serialize_entry("mapped_conditions", &findings.mapped_conditions)?;
                map.serialize_entry("doctor_note", &findings.doctor_note)?;
                map.serialize_entry("success", &true)?;
                map.end()
            }
            Self::Failed { error } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("success", &false)?;
                map.end()
            }
        }
    }
}

/// Result of one symptom-check run.
#[derive(Debug, Clone, Serialize)]
pub struct SymptomRun {
    /// The user-facing outcome.
    pub check: SymptomCheck,
    /// Records of the stages that ran, in order. A failed run ends with the
    /// failing stage.
    pub stages: Vec<StageRecord>,
    /// Wall-clock duration of the run.
    pub duration_ms: f64,
}

/// Runs `interpret_symptoms → map_conditions → generate_doctor_note`.
///
/// Each stage sees the full output of the stages before it. The first
/// failed model call ends the run.
#[derive(Clone)]
pub struct SymptomPipeline {
    interpreter: StageAgent,
    mapper: StageAgent,
    note_writer: StageAgent,
    event_sink: Arc<dyn EventSink>,
}

impl SymptomPipeline {
    /// Creates a pipeline whose three agents share `client`.
    #[must_use]
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            interpreter: StageAgent::for_stage(StageName::InterpretSymptoms, client.clone()),
            mapper: StageAgent::for_stage(StageName::MapConditions, client.clone()),
            note_writer: StageAgent::for_stage(StageName::GenerateDoctorNote, client),
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink used for every run.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Checks a free-text symptom description.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySymptoms`] for blank input. A model
    /// failure is reported as [`SymptomCheck::Failed`], not as an error.
    pub async fn run(&self, description: &str) -> Result<SymptomRun, CrewflowError> {
        self.run_with_identity(RunIdentity::new(), description).await
    }

    /// Checks the answers of a guided symptom form.
    ///
    /// # Errors
    ///
    /// Returns the form's validation error, if any, before a stage runs.
    pub async fn run_form(&self, form: &SymptomForm) -> Result<SymptomRun, CrewflowError> {
        let description = form.to_description()?;
        self.run(&description).await
    }

    /// Same as [`Self::run`] with a caller-supplied run identity.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub async fn run_with_identity(
        &self,
        identity: RunIdentity,
        description: &str,
    ) -> Result<SymptomRun, CrewflowError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptySymptoms.into());
        }

        let start = Instant::now();
        let mut ctx = PipelineContext::new(identity).with_event_sink(self.event_sink.clone());
        ctx.record(SYMPTOM_DESCRIPTION_KEY, description)?;

        info!(
            pipeline_run_id = %ctx.run_id().pipeline_run_id,
            description_chars = description.chars().count(),
            "Starting symptom check"
        );
        ctx.emit(EventKind::PipelineStarted, json!({"pipeline": "symptom"})).await;

        let mut stages = Vec::with_capacity(3);

        let symptoms = match step(&self.interpreter, description, &ctx, &mut stages).await {
            Ok(text) => text,
            Err(error) => return Ok(abort(&ctx, stages, error, start).await),
        };
        ctx.record(StageName::InterpretSymptoms.output_key(), symptoms.as_str())?;

        let conditions = match step(&self.mapper, &symptoms, &ctx, &mut stages).await {
            Ok(text) => text,
            Err(error) => return Ok(abort(&ctx, stages, error, start).await),
        };
        ctx.record(StageName::MapConditions.output_key(), conditions.as_str())?;

        let note_input = format!(
            "Structured symptoms:\n{symptoms}\n\nPotential areas of concern:\n{conditions}"
        );
        let note = match step(&self.note_writer, &note_input, &ctx, &mut stages).await {
            Ok(text) => text,
            Err(error) => return Ok(abort(&ctx, stages, error, start).await),
        };
        ctx.record(StageName::GenerateDoctorNote.output_key(), note.as_str())?;

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            pipeline_run_id = %ctx.run_id().pipeline_run_id,
            duration_ms,
            "Symptom check completed"
        );
        ctx.emit(
            EventKind::PipelineCompleted,
            json!({"pipeline": "symptom", "duration_ms": duration_ms}),
        )
        .await;

        Ok(SymptomRun {
            check: SymptomCheck::Completed(SymptomFindings {
                structured_symptoms: symptoms,
                mapped_conditions: conditions,
                doctor_note: note,
            }),
            stages,
            duration_ms,
        })
    }
}

/// Runs one stage, recording it. Returns the error message on failure.
async fn step(
    agent: &StageAgent,
    input: &str,
    ctx: &PipelineContext,
    stages: &mut Vec<StageRecord>,
) -> Result<String, String> {
    let Attempt {
        stage,
        started_at,
        outcome,
    } = attempt_stage(agent, input, ctx).await;

    match outcome {
        Ok(text) => {
            let record = StageRecord::finished(
                stage,
                started_at,
                StageResult::success(text.as_str()),
                true,
            );
            stages.push(announce(ctx, record).await);
            Ok(text)
        }
        Err(err) => {
            let error = err.to_string();
            let record = StageRecord::failed(stage, started_at, error.as_str());
            stages.push(announce(ctx, record).await);
            Err(error)
        }
    }
}

async fn abort(
    ctx: &PipelineContext,
    stages: Vec<StageRecord>,
    error: String,
    start: Instant,
) -> SymptomRun {
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    let failed_stage = stages.last().map(|r| r.stage.as_str());

    warn!(
        pipeline_run_id = %ctx.run_id().pipeline_run_id,
        failed_stage = failed_stage.unwrap_or_default(),
        error = %error,
        "Symptom check aborted"
    );
    ctx.emit(
        EventKind::PipelineFailed,
        json!({
            "pipeline": "symptom",
            "stage": failed_stage,
            "error": error,
            "duration_ms": duration_ms,
        }),
    )
    .await;

    SymptomRun {
        check: SymptomCheck::Failed { error },
        stages,
        duration_ms,
    }
}

impl std::fmt::Debug for SymptomPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymptomPipeline").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn findings() -> SymptomFindings {
        SymptomFindings {
            structured_symptoms: r#"{"primary_symptoms": ["headache"]}"#.into(),
            mapped_conditions: "```json\n{\"urgency_level\": \"low\"}\n```".into(),
            doctor_note: "Patient reports a headache.".into(),
        }
    }

    #[test]
    fn test_completed_serialization() {
        let value = serde_json::to_value(SymptomCheck::Completed(findings())).unwrap();
        assert_eq!(
            value,
            json!({
                "structured_symptoms": "{\"primary_symptoms\": [\"headache\"]}",
                "mapped_conditions": "```json\n{\"urgency_level\": \"low\"}\n```",
                "doctor_note": "Patient reports a headache.",
                "success": true,
            })
        );
    }

    #[test]
    fn test_failed_serialization() {
        let check = SymptomCheck::Failed {
            error: "Model request failed: timeout".into(),
        };
        assert_eq!(
            serde_json::to_value(&check).unwrap(),
            json!({"error": "Model request failed: timeout", "success": false})
        );
        assert_eq!(check.error(), Some("Model request failed: timeout"));
        assert!(check.findings().is_none());
    }

    #[test]
    fn test_findings_normalize_lazily() {
        let findings = findings();
        assert!(findings.symptoms().is_structured());
        assert_eq!(findings.conditions().get("urgency_level"), Some(&json!("low")));
        assert_eq!(findings.note().as_text(), Some("Patient reports a headache."));
    }
}
