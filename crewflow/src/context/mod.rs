//! Per-run context for pipeline execution.
//!
//! This module provides:
//! - Run identities for correlating logs and events
//! - The write-once field store that stages read from and append to

mod identity;
mod pipeline;

pub use identity::RunIdentity;
pub use pipeline::{truncate_chars, PipelineContext, DOCUMENT_TEXT_KEY, SYMPTOM_DESCRIPTION_KEY};
