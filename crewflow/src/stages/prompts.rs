//! Prompt templates for the six stage agents.

use crate::core::StageName;
use crate::model::ModelRequest;

/// Placeholder replaced by the stage's input when a template is rendered.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// A persona plus a task text with one `{context}` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Standing instructions sent as the system message.
    pub system: &'static str,
    /// Task text; `{context}` is replaced with the stage input.
    pub task: &'static str,
}

impl PromptTemplate {
    /// Creates a template.
    #[must_use]
    pub const fn new(system: &'static str, task: &'static str) -> Self {
        Self { system, task }
    }

    /// Renders the template into a model request.
    ///
    /// Only the first placeholder is substituted, so a `{context}` string
    /// inside user text is left alone.
    #[must_use]
    pub fn render(&self, context: &str) -> ModelRequest {
        let prompt = self.task.replacen(CONTEXT_PLACEHOLDER, context, 1);
        ModelRequest::new(self.system, prompt)
    }

    /// Returns the template for a stage.
    #[must_use]
    pub fn for_stage(stage: StageName) -> Self {
        match stage {
            StageName::ExtractClauses => CLAUSE_EXTRACTOR,
            StageName::AssessRisk => RISK_ASSESSOR,
            StageName::SuggestRevisions => REVISION_ADVISOR,
            StageName::InterpretSymptoms => SYMPTOM_INTERPRETER,
            StageName::MapConditions => CONDITION_MAPPER,
            StageName::GenerateDoctorNote => DOCTOR_NOTE_WRITER,
        }
    }
}

const CLAUSE_EXTRACTOR: PromptTemplate = PromptTemplate::new(
    "You are a senior contract lawyer. You read agreements carefully and \
     identify the clauses that define obligations, payment, liability, \
     termination, confidentiality and governing law.",
    "{context}\n\nExpected output: JSON object containing extracted clauses",
);

const RISK_ASSESSOR: PromptTemplate = PromptTemplate::new(
    "You are a legal risk analyst. You flag contract terms that expose a \
     party to one-sided liability, unclear obligations or unfavourable \
     termination, and you rate each risk as HIGH, MEDIUM or LOW.",
    "{context}\n\nExpected output: Plain text numbered list with format: \
     1. [RISK LEVEL] - Risk Type. Risk: explanation. Impact: consequences.",
);

const REVISION_ADVISOR: PromptTemplate = PromptTemplate::new(
    "You are a contract drafting expert. You rewrite risky clauses into \
     balanced, clear language that protects both parties.",
    "{context}\n\nExpected output: Plain text numbered list with format: \
     1. PROBLEMATIC CLAUSE: [text]. SUGGESTED REVISION: [better text]. \
     WHY THIS IS BETTER: [explanation].",
);

const SYMPTOM_INTERPRETER: PromptTemplate = PromptTemplate::new(
    "You are a medical intake assistant. You turn a patient's own words \
     into structured symptom information. You never diagnose.",
    "Interpret the following symptom description and structure it:\n\n{context}\n\n\
     Respond with a JSON object with the keys: primary_symptoms, \
     secondary_symptoms, duration, severity, body_parts_affected, \
     triggers, additional_notes.",
);

const CONDITION_MAPPER: PromptTemplate = PromptTemplate::new(
    "You are a clinical triage assistant. You map structured symptoms to \
     areas of concern a doctor may want to discuss. You never diagnose.",
    "Map these structured symptoms to potential areas of concern:\n\n{context}\n\n\
     Respond with a JSON object with the keys: urgency_level (low, medium \
     or high), probable_conditions, suggested_tests, doctor_specialties, \
     red_flags.",
);

const DOCTOR_NOTE_WRITER: PromptTemplate = PromptTemplate::new(
    "You are a medical scribe. You prepare concise visit summaries a \
     patient can hand to their doctor.",
    "Create a doctor visit summary from the following analysis:\n\n{context}\n\n\
     Respond with a JSON object with the keys: readable_format (a plain \
     text summary for the doctor) and json_format (an object including \
     preparation_date, chief_complaint, symptoms and questions_for_doctor).",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_context() {
        let request = PromptTemplate::for_stage(StageName::AssessRisk)
            .render("Analyze the following contract text");

        assert!(request.prompt.starts_with("Analyze the following contract text\n\n"));
        assert!(request.prompt.contains("1. [RISK LEVEL] - Risk Type."));
        assert!(!request.prompt.contains(CONTEXT_PLACEHOLDER));
        assert!(request.system.contains("risk analyst"));
    }

    #[test]
    fn test_render_leaves_placeholder_in_user_text() {
        let request = PromptTemplate::new("sys", "A: {context} B").render("x {context} y");
        assert_eq!(request.prompt, "A: x {context} y B");
    }

    #[test]
    fn test_every_stage_has_one_placeholder() {
        for stage in StageName::DOCUMENT.iter().chain(StageName::SYMPTOM.iter()) {
            let template = PromptTemplate::for_stage(*stage);
            assert_eq!(template.task.matches(CONTEXT_PLACEHOLDER).count(), 1, "{stage}");
        }
    }

    #[test]
    fn test_symptom_prompts_ask_for_json_keys() {
        let mapper = PromptTemplate::for_stage(StageName::MapConditions);
        assert!(mapper.task.contains("urgency_level"));

        let note = PromptTemplate::for_stage(StageName::GenerateDoctorNote);
        assert!(note.task.contains("readable_format"));
        assert!(note.task.contains("preparation_date"));
    }
}
