//! Report assembly and presentation shaping.
//!
//! This module provides:
//! - The fixed-shape [`AnalysisReport`] returned by the contract pipeline
//! - Renderers that turn a report into a downloadable document
//! - Pure data shaping used by front ends: key humanizing, risk and urgency
//!   classification, and the symptom visit summary

mod display;
mod render;
mod risk;
mod symptom;

pub use display::{display_lines, humanize_key};
pub use render::{
    report_file_name, save_report, RenderedDocument, ReportRenderer, TextReportRenderer,
};
pub use risk::{parse_risk_items, RiskItem, RiskSeverity, UrgencyLevel};
pub use symptom::{
    save_visit_summary, visit_summary_text, SYMPTOM_DISCLAIMER, VISIT_SUMMARY_FILE_NAME,
};

use serde::{Deserialize, Serialize};

/// Legal disclaimer attached to every contract report.
pub const DISCLAIMER: &str = "This analysis is for informational purposes only and does not \
constitute legal advice. Always consult with a qualified attorney for legal matters.";

/// The outcome of a contract analysis, one text per stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Name of the analysed file, if the client sent one.
    pub filename: Option<String>,
    /// Clause-extraction output or its substitute.
    pub extracted_clauses: String,
    /// Risk-assessment output or its substitute.
    pub risk_assessment: String,
    /// Revision suggestions or the generic list.
    pub suggestions: String,
    /// Always [`DISCLAIMER`] for reports built here.
    pub disclaimer: String,
}

impl AnalysisReport {
    /// Assembles a report with the standard disclaimer.
    #[must_use]
    pub fn new(
        filename: Option<String>,
        extracted_clauses: impl Into<String>,
        risk_assessment: impl Into<String>,
        suggestions: impl Into<String>,
    ) -> Self {
        Self {
            filename,
            extracted_clauses: extracted_clauses.into(),
            risk_assessment: risk_assessment.into(),
            suggestions: suggestions.into(),
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    /// Parses the numbered risk list.
    #[must_use]
    pub fn risk_items(&self) -> Vec<RiskItem> {
        parse_risk_items(&self.risk_assessment)
    }

    /// Counts risks per severity: `(high, medium, low)`.
    #[must_use]
    pub fn severity_counts(&self) -> (usize, usize, usize) {
        self.risk_items()
            .iter()
            .fold((0, 0, 0), |(high, medium, low), item| match item.severity {
                RiskSeverity::High => (high + 1, medium, low),
                RiskSeverity::Medium => (high, medium + 1, low),
                RiskSeverity::Low => (high, medium, low + 1),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_report_shape() {
        let report = AnalysisReport::new(Some("nda.pdf".into()), "c", "r", "s");
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "filename": "nda.pdf",
                "extracted_clauses": "c",
                "risk_assessment": "r",
                "suggestions": "s",
                "disclaimer": DISCLAIMER,
            })
        );
    }

    #[test]
    fn test_unnamed_report_serializes_null_filename() {
        let report = AnalysisReport::new(None, "c", "r", "s");
        let value = serde_json::to_value(&report).unwrap();
        assert!(value["filename"].is_null());
        assert_eq!(value.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_severity_counts() {
        let report = AnalysisReport::new(
            None,
            "",
            "1. [HIGH RISK] - Liability. Risk: uncapped.\n\
             2. [LOW RISK] - Notice. Risk: short.\n\
             3. [HIGH RISK] - Termination. Risk: one-sided.",
            "",
        );
        assert_eq!(report.severity_counts(), (2, 0, 1));
    }
}
