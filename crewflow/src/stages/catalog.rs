//! Fixed substitute texts for every stage.

use crate::core::StageName;

/// Suggestions shown when the suggestion stage fails or is never attempted.
pub const GENERIC_SUGGESTIONS: &str = concat!(
    "1. PROBLEMATIC CLAUSE: Contract terms may lack clarity or balance. \n",
    "SUGGESTED REVISION: Review all contract terms with qualified legal counsel to ensure fair and clear provisions. \n",
    "WHY THIS IS BETTER: Professional legal review ensures balanced terms and reduces risk of disputes.\n",
    "\n",
    "2. PROBLEMATIC CLAUSE: Payment and liability terms may be one-sided. \n",
    "SUGGESTED REVISION: Implement mutual liability caps, clear payment schedules, and balanced termination clauses. \n",
    "WHY THIS IS BETTER: Balanced terms protect both parties and promote successful business relationships.\n",
    "\n",
    "Note: Due to API rate limits, detailed suggestions were not generated. ",
    "Please consult with a qualified attorney for specific contract improvements.",
);

/// Degradation reason recorded when suggestions are skipped.
pub const RISK_UNAVAILABLE_REASON: &str = "risk assessment unavailable";

/// The three texts that can stand in for a stage's model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagePlaceholders {
    /// Used when the model call fails.
    pub on_error: &'static str,
    /// Used when the output is only the runtime sentinel.
    pub on_sentinel: &'static str,
    /// Used when the output is blank.
    pub on_empty: &'static str,
}

impl StagePlaceholders {
    /// Returns the placeholders for a stage.
    #[must_use]
    pub fn for_stage(stage: StageName) -> Self {
        match stage {
            StageName::ExtractClauses => Self {
                on_error: "Clause extraction encountered an error.",
                on_sentinel: "Clause extraction completed successfully.",
                on_empty: "Contract clauses extracted successfully.",
            },
            StageName::AssessRisk => Self {
                on_error: "Risk assessment encountered an error. Please try again.",
                on_sentinel: "Risk assessment completed successfully.",
                on_empty: "No risks identified.",
            },
            StageName::SuggestRevisions => Self {
                on_error: GENERIC_SUGGESTIONS,
                on_sentinel: "Suggestion generation completed successfully.",
                on_empty: "No suggestions generated.",
            },
            // The symptom pipeline aborts on error, so `on_error` is only
            // informational there.
            StageName::InterpretSymptoms => Self {
                on_error: "Symptom interpretation encountered an error.",
                on_sentinel: "Symptom interpretation completed successfully.",
                on_empty: "No structured symptoms produced.",
            },
            StageName::MapConditions => Self {
                on_error: "Condition mapping encountered an error.",
                on_sentinel: "Condition mapping completed successfully.",
                on_empty: "No conditions mapped.",
            },
            StageName::GenerateDoctorNote => Self {
                on_error: "Doctor note generation encountered an error.",
                on_sentinel: "Doctor note generation completed successfully.",
                on_empty: "No doctor note produced.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_error_is_generic_list() {
        let placeholders = StagePlaceholders::for_stage(StageName::SuggestRevisions);
        assert_eq!(placeholders.on_error, GENERIC_SUGGESTIONS);
        assert!(GENERIC_SUGGESTIONS.starts_with("1. PROBLEMATIC CLAUSE"));
        assert!(GENERIC_SUGGESTIONS.contains("\n\n2. PROBLEMATIC CLAUSE"));
    }

    #[test]
    fn test_every_stage_has_distinct_sentinel_phrase() {
        let mut phrases: Vec<_> = StageName::DOCUMENT
            .iter()
            .chain(StageName::SYMPTOM.iter())
            .map(|s| StagePlaceholders::for_stage(*s).on_sentinel)
            .collect();
        phrases.sort_unstable();
        phrases.dedup();
        assert_eq!(phrases.len(), 6);
        assert!(phrases.iter().all(|p| p.ends_with("completed successfully.")));
    }
}
