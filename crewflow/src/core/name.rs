//! Stage names for the two pipelines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every stage known to crewflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// Pulls the key clauses out of a contract.
    ExtractClauses,
    /// Lists risks found in a contract.
    AssessRisk,
    /// Proposes safer wording for risky clauses.
    SuggestRevisions,
    /// Turns a free-text description into structured symptoms.
    InterpretSymptoms,
    /// Maps structured symptoms to areas of concern.
    MapConditions,
    /// Writes a summary to bring to a doctor.
    GenerateDoctorNote,
}

impl StageName {
    /// Contract pipeline stages, in execution order.
    pub const DOCUMENT: [Self; 3] = [Self::ExtractClauses, Self::AssessRisk, Self::SuggestRevisions];

    /// Symptom pipeline stages, in execution order.
    pub const SYMPTOM: [Self; 3] = [
        Self::InterpretSymptoms,
        Self::MapConditions,
        Self::GenerateDoctorNote,
    ];

    /// Returns the stage identifier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExtractClauses => "extract_clauses",
            Self::AssessRisk => "assess_risk",
            Self::SuggestRevisions => "suggest_revisions",
            Self::InterpretSymptoms => "interpret_symptoms",
            Self::MapConditions => "map_conditions",
            Self::GenerateDoctorNote => "generate_doctor_note",
        }
    }

    /// Returns the context and report field the stage writes.
    #[must_use]
    pub fn output_key(&self) -> &'static str {
        match self {
            Self::ExtractClauses => "extracted_clauses",
            Self::AssessRisk => "risk_assessment",
            Self::SuggestRevisions => "suggestions",
            Self::InterpretSymptoms => "structured_symptoms",
            Self::MapConditions => "mapped_conditions",
            Self::GenerateDoctorNote => "doctor_note",
        }
    }

    /// Returns true for contract pipeline stages.
    #[must_use]
    pub fn is_document_stage(&self) -> bool {
        Self::DOCUMENT.contains(self)
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde() {
        for name in StageName::DOCUMENT.iter().chain(StageName::SYMPTOM.iter()) {
            let json = serde_json::to_string(name).unwrap();
            assert_eq!(json, format!("\"{name}\""));
        }
    }

    #[test]
    fn test_output_keys() {
        assert_eq!(StageName::AssessRisk.output_key(), "risk_assessment");
        assert_eq!(StageName::SuggestRevisions.output_key(), "suggestions");
        assert_eq!(StageName::GenerateDoctorNote.output_key(), "doctor_note");
    }

    #[test]
    fn test_pipeline_membership() {
        assert!(StageName::ExtractClauses.is_document_stage());
        assert!(!StageName::MapConditions.is_document_stage());
    }
}
