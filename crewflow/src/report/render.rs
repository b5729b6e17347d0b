//! Turning an [`AnalysisReport`] into a downloadable document.

use super::{display_lines, AnalysisReport};
use crate::errors::{CrewflowError, RenderError};
use crate::normalize::parse_json_safely;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const RULE: &str = "============================================================";

/// A rendered report ready to hand to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Suggested download name.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub media_type: &'static str,
    /// Document contents.
    pub bytes: Vec<u8>,
}

/// Renders analysis reports into a document format.
pub trait ReportRenderer: Send + Sync {
    /// Renders a report.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the document cannot be produced.
    fn render(&self, report: &AnalysisReport) -> Result<RenderedDocument, RenderError>;
}

/// Returns `contract_risk_assessment_{filename or "report"}.{extension}`.
#[must_use]
pub fn report_file_name(report: &AnalysisReport, extension: &str) -> String {
    let stem = report.filename.as_deref().unwrap_or("report");
    format!("contract_risk_assessment_{stem}.{extension}")
}

/// Renders `report` and writes it into `dir` under its suggested name.
///
/// # Errors
///
/// Returns [`CrewflowError::Render`] if rendering fails and
/// [`CrewflowError::Io`] if the file cannot be written.
pub fn save_report(
    renderer: &dyn ReportRenderer,
    report: &AnalysisReport,
    dir: &Path,
) -> Result<PathBuf, CrewflowError> {
    let doc = renderer.render(report)?;
    let path = dir.join(&doc.file_name);
    std::fs::write(&path, &doc.bytes)?;
    info!(path = %path.display(), bytes = doc.bytes.len(), media_type = doc.media_type, "Report saved");
    Ok(path)
}

/// Plain-text renderer.
#[derive(Debug, Clone, Default)]
pub struct TextReportRenderer {
    generated_at: Option<DateTime<Utc>>,
}

impl TextReportRenderer {
    /// Creates a renderer stamping documents with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps every document with a fixed time.
    #[must_use]
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    fn write_report(&self, report: &AnalysisReport, out: &mut String) -> std::fmt::Result {
        let generated_at = self.generated_at.unwrap_or_else(Utc::now);
        let (high, medium, low) = report.severity_counts();

        writeln!(out, "{RULE}")?;
        writeln!(out, "CONTRACT RISK ASSESSMENT REPORT")?;
        writeln!(out, "{RULE}")?;
        writeln!(
            out,
            "Document: {}",
            report.filename.as_deref().unwrap_or("Unnamed document")
        )?;
        writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC"))?;
        writeln!(
            out,
            "Risks identified: {} (high {high}, medium {medium}, low {low})",
            high + medium + low
        )?;

        writeln!(out, "\nEXTRACTED CLAUSES\n{}", "-".repeat(17))?;
        for line in display_lines(&parse_json_safely(&report.extracted_clauses)) {
            writeln!(out, "{line}")?;
        }

        writeln!(out, "\nRISK ASSESSMENT\n{}", "-".repeat(15))?;
        writeln!(out, "{}", report.risk_assessment.trim_end())?;

        writeln!(out, "\nSUGGESTED REVISIONS\n{}", "-".repeat(19))?;
        writeln!(out, "{}", report.suggestions.trim_end())?;

        writeln!(out, "\nDISCLAIMER\n{}", "-".repeat(10))?;
        writeln!(out, "{}", report.disclaimer)
    }
}

impl ReportRenderer for TextReportRenderer {
    fn render(&self, report: &AnalysisReport) -> Result<RenderedDocument, RenderError> {
        let mut out = String::new();
        self.write_report(report, &mut out)
            .map_err(|e| RenderError::new(e.to_string()))?;

        Ok(RenderedDocument {
            file_name: report_file_name(report, "txt"),
            media_type: "text/plain",
            bytes: out.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DISCLAIMER;
    use chrono::TimeZone;

    fn report(filename: Option<&str>) -> AnalysisReport {
        AnalysisReport::new(
            filename.map(str::to_string),
            r#"{"payment_terms": "Net 30", "termination": "Either party, 30 days notice"}"#,
            "1. [HIGH RISK] - Liability. Risk: uncapped.\n2. [MEDIUM RISK] - Renewal.",
            "1. PROBLEMATIC CLAUSE: Unlimited liability.",
        )
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            report_file_name(&report(Some("nda.pdf")), "txt"),
            "contract_risk_assessment_nda.pdf.txt"
        );
        assert_eq!(
            report_file_name(&report(None), "pdf"),
            "contract_risk_assessment_report.pdf"
        );
    }

    #[test]
    fn test_text_render() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let doc = TextReportRenderer::new()
            .with_generated_at(at)
            .render(&report(Some("lease.docx")))
            .unwrap();

        assert_eq!(doc.media_type, "text/plain");
        assert_eq!(doc.file_name, "contract_risk_assessment_lease.docx.txt");

        let text = String::from_utf8(doc.bytes).unwrap();
        assert!(text.contains("Document: lease.docx\n"));
        assert!(text.contains("Generated: 2024-05-01 09:30 UTC\n"));
        assert!(text.contains("Risks identified: 2 (high 1, medium 1, low 0)\n"));
        assert!(text.contains("Payment Terms: Net 30\nTermination: Either party, 30 days notice\n"));
        assert!(text.contains("SUGGESTED REVISIONS\n-------------------\n1. PROBLEMATIC CLAUSE"));
        assert!(text.trim_end().ends_with(DISCLAIMER));
    }

    #[test]
    fn test_render_from_client_json() {
        let json = serde_json::json!({
            "filename": null,
            "extracted_clauses": "Clause extraction encountered an error.",
            "risk_assessment": "Risk assessment encountered an error. Please try again.",
            "suggestions": "generic",
            "disclaimer": DISCLAIMER,
        });
        let report: AnalysisReport = serde_json::from_value(json).unwrap();
        let doc = TextReportRenderer::new().render(&report).unwrap();

        let text = String::from_utf8(doc.bytes).unwrap();
        assert!(text.contains("Document: Unnamed document\n"));
        assert!(text.contains("Risks identified: 0 (high 0, medium 0, low 0)\n"));
        assert!(text.contains("EXTRACTED CLAUSES\n-----------------\nClause extraction encountered an error.\n"));
    }

    struct BrokenRenderer;

    impl ReportRenderer for BrokenRenderer {
        fn render(&self, _report: &AnalysisReport) -> Result<RenderedDocument, RenderError> {
            Err(RenderError::new("font missing"))
        }
    }

    #[test]
    fn test_save_report_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_report(&TextReportRenderer::new(), &report(Some("nda.pdf")), dir.path())
            .unwrap();

        assert_eq!(path, dir.path().join("contract_risk_assessment_nda.pdf.txt"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(RULE));
    }

    #[test]
    fn test_save_report_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_report(&BrokenRenderer, &report(None), dir.path()).unwrap_err();
        assert!(matches!(err, CrewflowError::Render(_)));
        assert_eq!(err.to_string(), "Report generation failed: font missing");

        let missing = dir.path().join("does-not-exist");
        let err = save_report(&TextReportRenderer::new(), &report(None), &missing).unwrap_err();
        assert!(matches!(err, CrewflowError::Io(_)));
    }
}
