//! Testing utilities for crewflow pipelines.
//!
//! This module provides:
//! - A scripted model client and a stub document parser
//! - Assertions over stage records

mod assertions;
mod mocks;

pub use assertions::{
    assert_stage_degraded, assert_stage_order, assert_stage_status, assert_stage_success,
};
pub use mocks::{ParseCall, ScriptedModelClient, StubDocumentParser};
