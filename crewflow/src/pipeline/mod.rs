//! Pipeline orchestration.
//!
//! This module provides:
//! - The contract-analysis pipeline with per-stage isolation
//! - The symptom-checker pipeline with hard abort
//! - The stage runner both share

mod document;
mod runner;
mod symptom;


pub use document::{
    clause_instruction, risk_instruction, suggestion_instruction, DocumentAnalysis,
    DocumentPipeline,
};
pub use symptom::{SymptomCheck, SymptomFindings, SymptomPipeline, SymptomRun};
