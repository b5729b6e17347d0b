//! Test assertions for stage records.

use crate::core::{StageName, StageRecord, StageStatus};

/// Asserts that the stage used model output.
pub fn assert_stage_success(record: &StageRecord) {
    assert!(
        record.status.is_success(),
        "Expected {} to complete, got status: {:?}",
        record.stage,
        record.status
    );
}

/// Asserts that the stage fell back to `expected_text`.
pub fn assert_stage_degraded(record: &StageRecord, expected_text: &str) {
    assert!(
        matches!(record.status, StageStatus::Degraded | StageStatus::Skipped),
        "Expected {} to degrade, got status: {:?}",
        record.stage,
        record.status
    );
    assert_eq!(
        record.text(),
        Some(expected_text),
        "Unexpected fallback text for {}",
        record.stage
    );
}

/// Asserts that the record has the expected status.
pub fn assert_stage_status(record: &StageRecord, expected: StageStatus) {
    assert_eq!(
        record.status, expected,
        "Expected status {:?} for {}, got {:?}",
        expected, record.stage, record.status
    );
}

/// Asserts that the records cover exactly `expected`, in order.
pub fn assert_stage_order(records: &[StageRecord], expected: &[StageName]) {
    let actual: Vec<StageName> = records.iter().map(|r| r.stage).collect();
    assert_eq!(actual, expected, "Unexpected stage order");
}
