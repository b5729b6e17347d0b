//! Core domain model types for crewflow.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Stage names for both pipelines
//! - Stage status and the per-stage result type
//! - Timed records of executed stages

mod name;
mod record;
mod result;
mod status;

pub use name::StageName;
pub use record::StageRecord;
pub use result::StageResult;
pub use status::StageStatus;
