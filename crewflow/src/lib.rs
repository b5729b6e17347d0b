//! # Crewflow
//!
//! Sequential multi-agent pipelines that push user text through a fixed
//! chain of language-model prompts.
//!
//! Two pipelines ship with the crate:
//!
//! - **Contract analysis**: `extract_clauses → assess_risk → suggest_revisions`.
//!   Every stage degrades to placeholder text on failure, so a complete
//!   [`report::AnalysisReport`] is always produced.
//! - **Symptom checking**: `interpret_symptoms → map_conditions → generate_doctor_note`.
//!   Any stage failure aborts the run with a single error message.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crewflow::prelude::*;
//! use std::sync::Arc;
//!
//! let config = ModelConfig::from_env()?;
//! let client: Arc<dyn ModelClient> = Arc::new(OpenAiChatClient::new(&config)?);
//!
//! let pipeline = DocumentPipeline::new(client, DocumentPipelineConfig::default());
//! let analysis = pipeline.run(Some("nda.pdf".into()), &contract_text).await?;
//! println!("{}", analysis.report.risk_assessment);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod context;
pub mod core;
pub mod document;
pub mod errors;
pub mod events;
pub mod form;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{CrewflowConfig, DocumentPipelineConfig, ModelConfig};
    pub use crate::context::{PipelineContext, RunIdentity};
    pub use crate::core::{StageName, StageRecord, StageResult, StageStatus};
    pub use crate::document::{ContentType, DocumentParser, Upload};
    pub use crate::errors::{CrewflowError, ModelError, ValidationError};
    pub use crate::form::{BodyArea, SymptomDuration, SymptomForm, SymptomTiming};
    pub use crate::events::{
        CollectingEventSink, EventKind, EventSink, LoggingEventSink, NoOpEventSink, PipelineEvent,
    };
    pub use crate::model::{ModelClient, ModelRequest, ModelResponse};
    #[cfg(feature = "http-client")]
    pub use crate::model::OpenAiChatClient;
    pub use crate::normalize::{parse_json_safely, DisplayValue};
    pub use crate::pipeline::{
        DocumentAnalysis, DocumentPipeline, SymptomCheck, SymptomFindings, SymptomPipeline,
        SymptomRun,
    };
    pub use crate::report::{AnalysisReport, ReportRenderer, TextReportRenderer};
    pub use crate::stages::StageAgent;
}
