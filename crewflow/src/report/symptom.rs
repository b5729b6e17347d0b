//! The downloadable visit summary for a completed symptom check.

use crate::errors::CrewflowError;
use crate::normalize::DisplayValue;
use crate::pipeline::SymptomFindings;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Medical disclaimer closing every visit summary.
pub const SYMPTOM_DISCLAIMER: &str =
    "This is NOT a medical diagnosis. Always consult healthcare professionals.";

/// Suggested file name for the visit summary.
pub const VISIT_SUMMARY_FILE_NAME: &str = "symptom_summary.txt";

const SUMMARY_TITLE: &str = "SYMPTOM CHECKER & DOCTOR PREP BOT - VISIT SUMMARY";

fn as_display(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_string)
}

/// Objects are pretty-printed; everything else is shown as produced.
fn section_body(value: &DisplayValue, raw: &str) -> String {
    if value.as_object().is_some() {
        value.to_pretty_string()
    } else {
        raw.to_string()
    }
}

/// Builds the plain-text visit summary.
///
/// Returns `None` unless the doctor note is a JSON object with a
/// `readable_format` field.
#[must_use]
pub fn visit_summary_text(findings: &SymptomFindings) -> Option<String> {
    let note = findings.note();
    let readable = note.get("readable_format").map(as_display)?;
    let generated_on = note
        .get("json_format")
        .and_then(|format| format.get("preparation_date"))
        .map_or_else(|| "N/A".to_string(), as_display);

    let symptoms = section_body(&findings.symptoms(), &findings.structured_symptoms);
    let conditions = section_body(&findings.conditions(), &findings.mapped_conditions);

    Some(format!(
        "{SUMMARY_TITLE}\n\
         Generated on: {generated_on}\n\
         \n\
         {readable}\n\
         \n\
         STRUCTURED SYMPTOMS:\n\
         {symptoms}\n\
         \n\
         POTENTIAL AREAS OF CONCERN:\n\
         {conditions}\n\
         \n\
         DISCLAIMER: {SYMPTOM_DISCLAIMER}\n"
    ))
}

/// Writes the visit summary into `dir` as [`VISIT_SUMMARY_FILE_NAME`].
///
/// Returns `Ok(None)` without touching the filesystem when the findings
/// carry no readable doctor note.
///
/// # Errors
///
/// Returns [`CrewflowError::Io`] if the file cannot be written.
pub fn save_visit_summary(
    findings: &SymptomFindings,
    dir: &Path,
) -> Result<Option<PathBuf>, CrewflowError> {
    let Some(summary) = visit_summary_text(findings) else {
        return Ok(None);
    };
    let path = dir.join(VISIT_SUMMARY_FILE_NAME);
    std::fs::write(&path, summary)?;
    Ok(Some(path))
}
