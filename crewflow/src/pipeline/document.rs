//! The contract-analysis pipeline.

use super::runner::{announce, attempt_stage};
use crate::config::DocumentPipelineConfig;
use crate::context::{PipelineContext, RunIdentity, DOCUMENT_TEXT_KEY};
use crate::core::{StageName, StageRecord, StageResult};
use crate::document::{extract_upload_text, DocumentParser, Upload};
use crate::errors::{CrewflowError, ValidationError};
use crate::events::{EventKind, EventSink, NoOpEventSink};
use crate::model::ModelClient;
use crate::report::AnalysisReport;
use crate::stages::{StageAgent, GENERIC_SUGGESTIONS, RISK_UNAVAILABLE_REASON};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Result of one contract analysis.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    /// The assembled report; always complete.
    pub report: AnalysisReport,
    /// One record per stage, in execution order.
    pub stages: Vec<StageRecord>,
    /// Wall-clock duration of the run.
    pub duration_ms: f64,
}

impl DocumentAnalysis {
    /// Returns the record for a stage.
    #[must_use]
    pub fn stage(&self, name: StageName) -> Option<&StageRecord> {
        self.stages.iter().find(|r| r.stage == name)
    }

    /// Returns true if every stage used model output.
    #[must_use]
    pub fn fully_succeeded(&self) -> bool {
        self.stages.iter().all(|r| r.status.is_success())
    }
}

/// Builds the clause-extraction instruction.
#[must_use]
pub fn clause_instruction(text: &str) -> String {
    format!("Extract key contract clauses from the following document text:\n\n{text}")
}

/// Builds the risk-assessment instruction.
#[must_use]
pub fn risk_instruction(text: &str) -> String {
    format!(
        "Analyze the following contract text for potential risks. Output MUST be plain text \
         numbered list format.\n\nContract text:\n{text}"
    )
}

/// Builds the revision-suggestion instruction from the two excerpts.
#[must_use]
pub fn suggestion_instruction(source_excerpt: &str, risk_excerpt: &str) -> String {
    format!(
        "Generate safer alternative wordings for the contract. Use this context:\n\n\
         Contract text:\n{source_excerpt}...\n\n\
         Identified risks:\n{risk_excerpt}...\n\n\
         Output MUST be plain text numbered list format."
    )
}

/// Runs `extract_clauses → assess_risk → suggest_revisions`.
///
/// Every stage is isolated: a failed model call degrades that stage to its
/// fallback text and the run continues. Suggestions are only requested when
/// the risk assessment succeeded.
#[derive(Clone)]
pub struct DocumentPipeline {
    extractor: StageAgent,
    assessor: StageAgent,
    advisor: StageAgent,
    config: DocumentPipelineConfig,
    event_sink: Arc<dyn EventSink>,
}

impl DocumentPipeline {
    /// Creates a pipeline whose three agents share `client`.
    #[must_use]
    pub fn new(client: Arc<dyn ModelClient>, config: DocumentPipelineConfig) -> Self {
        Self {
            extractor: StageAgent::for_stage(StageName::ExtractClauses, client.clone()),
            assessor: StageAgent::for_stage(StageName::AssessRisk, client.clone()),
            advisor: StageAgent::for_stage(StageName::SuggestRevisions, client),
            config,
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink used for every run.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DocumentPipelineConfig {
        &self.config
    }

    /// Validates an upload, extracts its text and analyses it.
    ///
    /// The staged temp file is already removed when the pipeline starts.
    ///
    /// # Errors
    ///
    /// Returns validation, I/O and parse errors from intake. Model failures
    /// never surface here.
    pub async fn analyze_upload(
        &self,
        parser: &dyn DocumentParser,
        upload: &Upload,
    ) -> Result<DocumentAnalysis, CrewflowError> {
        let text = extract_upload_text(parser, upload)?;
        self.run(upload.filename.clone(), &text).await
    }

    /// Analyses already-extracted contract text.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyDocument`] for blank
    /// text. Model failures degrade stages instead of failing the run.
    pub async fn run(
        &self,
        filename: Option<String>,
        text: &str,
    ) -> Result<DocumentAnalysis, CrewflowError> {
        self.run_with_identity(RunIdentity::new(), filename, text).await
    }

    /// Same as [`Self::run`] with a caller-supplied run identity.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub async fn run_with_identity(
        &self,
        identity: RunIdentity,
        filename: Option<String>,
        text: &str,
    ) -> Result<DocumentAnalysis, CrewflowError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyDocument.into());
        }

        let start = Instant::now();
        let mut ctx = PipelineContext::new(identity).with_event_sink(self.event_sink.clone());
        ctx.record(DOCUMENT_TEXT_KEY, text)?;

        info!(
            pipeline_run_id = %ctx.run_id().pipeline_run_id,
            filename = filename.as_deref().unwrap_or("<unnamed>"),
            text_chars = text.chars().count(),
            "Starting contract analysis"
        );
        ctx.emit(
            EventKind::PipelineStarted,
            json!({"pipeline": "document", "filename": filename}),
        )
        .await;

        let mut stages = Vec::with_capacity(3);

        let clauses = self.isolated(&self.extractor, &clause_instruction(text), &ctx).await;
        ctx.record(StageName::ExtractClauses.output_key(), clauses.text().unwrap_or_default())?;
        stages.push(clauses);

        let risk = self.isolated(&self.assessor, &risk_instruction(text), &ctx).await;
        ctx.record(StageName::AssessRisk.output_key(), risk.text().unwrap_or_default())?;
        let risk_succeeded = risk.result.as_ref().is_some_and(StageResult::is_success);
        stages.push(risk);

        let suggestions = if risk_succeeded {
            let instruction = suggestion_instruction(
                ctx.excerpt(DOCUMENT_TEXT_KEY, self.config.source_excerpt_chars)
                    .unwrap_or_default(),
                ctx.excerpt(StageName::AssessRisk.output_key(), self.config.risk_excerpt_chars)
                    .unwrap_or_default(),
            );
            self.isolated(&self.advisor, &instruction, &ctx).await
        } else {
            let record = StageRecord::finished(
                StageName::SuggestRevisions,
                Utc::now(),
                StageResult::degraded(GENERIC_SUGGESTIONS, RISK_UNAVAILABLE_REASON),
                false,
            );
            announce(&ctx, record).await
        };
        ctx.record(
            StageName::SuggestRevisions.output_key(),
            suggestions.text().unwrap_or_default(),
        )?;
        stages.push(suggestions);

        let report = AnalysisReport::new(
            filename,
            stage_text(&stages, StageName::ExtractClauses),
            stage_text(&stages, StageName::AssessRisk),
            stage_text(&stages, StageName::SuggestRevisions),
        );

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        let degraded: Vec<_> = stages
            .iter()
            .filter(|r| !r.status.is_success())
            .map(|r| r.stage.as_str())
            .collect();

        info!(
            pipeline_run_id = %ctx.run_id().pipeline_run_id,
            duration_ms,
            degraded_stages = ?degraded,
            "Contract analysis completed"
        );
        ctx.emit(
            EventKind::PipelineCompleted,
            json!({
                "pipeline": "document",
                "duration_ms": duration_ms,
                "degraded_stages": degraded,
            }),
        )
        .await;

        Ok(DocumentAnalysis {
            report,
            stages,
            duration_ms,
        })
    }

    async fn isolated(
        &self,
        agent: &StageAgent,
        instruction: &str,
        ctx: &PipelineContext,
    ) -> StageRecord {
        let (result, started_at) = attempt_stage(agent, instruction, ctx).await.into_result();
        announce(ctx, StageRecord::finished(agent.name(), started_at, result, true)).await
    }
}

impl std::fmt::Debug for DocumentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn stage_text(stages: &[StageRecord], name: StageName) -> String {
    stages
        .iter()
        .find(|r| r.stage == name)
        .and_then(StageRecord::text)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_templates() {
        assert_eq!(
            clause_instruction("ABC"),
            "Extract key contract clauses from the following document text:\n\nABC"
        );
        assert_eq!(
            risk_instruction("ABC"),
            "Analyze the following contract text for potential risks. Output MUST be plain text numbered list format.\n\nContract text:\nABC"
        );
        assert_eq!(
            suggestion_instruction("SRC", "RISK"),
            "Generate safer alternative wordings for the contract. Use this context:\n\nContract text:\nSRC...\n\nIdentified risks:\nRISK...\n\nOutput MUST be plain text numbered list format."
        );
    }
}
