//! Upload intake for the contract pipeline.
//!
//! Text extraction itself lives behind [`DocumentParser`]; this module only
//! validates the upload, stages the bytes in a temporary file for the
//! parser, and guarantees that file is gone before returning.

use crate::errors::{CrewflowError, ParseError, ValidationError};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// MIME type of PDF uploads.
pub const PDF_MIME: &str = "application/pdf";
/// MIME type of DOCX uploads.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const DEFAULT_UPLOAD_NAME: &str = "contract.pdf";

/// Accepted document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word-processing document.
    Docx,
}

impl ContentType {
    /// Parses a MIME type, accepting only PDF and DOCX.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedContentType`] for anything else.
    pub fn from_mime(mime: &str) -> Result<Self, ValidationError> {
        match mime {
            PDF_MIME => Ok(Self::Pdf),
            DOCX_MIME => Ok(Self::Docx),
            other => Err(ValidationError::UnsupportedContentType {
                content_type: other.to_string(),
            }),
        }
    }

    /// Returns the MIME type.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME,
            Self::Docx => DOCX_MIME,
        }
    }

    /// Returns the conventional file extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

/// Extracts plain text from a stored document.
pub trait DocumentParser: Send + Sync {
    /// Reads the file at `path` and returns its text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the file cannot be read or decoded.
    fn parse(&self, path: &Path, content_type: ContentType) -> Result<String, ParseError>;
}

/// An uploaded file as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Client-supplied file name.
    pub filename: Option<String>,
    /// Client-declared MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Creates an upload.
    #[must_use]
    pub fn new(
        filename: Option<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename,
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Returns the temp-file suffix: the file name's extension with its dot.
    ///
    /// Unnamed uploads are treated as `contract.pdf`; a name without an
    /// extension yields an empty suffix.
    #[must_use]
    pub fn suffix(&self) -> String {
        let name = self.filename.as_deref().unwrap_or(DEFAULT_UPLOAD_NAME);
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default()
    }
}

/// Validates an upload and extracts its text.
///
/// The bytes are written to a temporary file that is removed when this
/// function returns, whether parsing succeeded or not.
///
/// # Errors
///
/// - [`ValidationError::UnsupportedContentType`] before anything is written
/// - [`CrewflowError::Io`] if the temporary file cannot be written
/// - [`CrewflowError::Parse`] if the parser fails
/// - [`ValidationError::EmptyDocument`] if the text is blank
pub fn extract_upload_text(
    parser: &dyn DocumentParser,
    upload: &Upload,
) -> Result<String, CrewflowError> {
    let content_type = ContentType::from_mime(&upload.content_type)?;

    let mut staged = tempfile::Builder::new()
        .prefix("crewflow-upload-")
        .suffix(&upload.suffix())
        .tempfile()?;
    staged.write_all(&upload.bytes)?;
    staged.flush()?;

    debug!(
        path = %staged.path().display(),
        bytes = upload.bytes.len(),
        content_type = content_type.mime(),
        "Staged upload for parsing"
    );

    let text = parser.parse(staged.path(), content_type)?;
    drop(staged);

    if text.trim().is_empty() {
        return Err(ValidationError::EmptyDocument.into());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubDocumentParser;

    fn pdf_upload(bytes: &[u8]) -> Upload {
        Upload::new(Some("nda.pdf".into()), PDF_MIME, bytes.to_vec())
    }

    #[test]
    fn test_from_mime() {
        assert_eq!(ContentType::from_mime(PDF_MIME).unwrap(), ContentType::Pdf);
        assert_eq!(ContentType::from_mime(DOCX_MIME).unwrap(), ContentType::Docx);
        assert_eq!(ContentType::Docx.extension(), "docx");

        let err = ContentType::from_mime("text/plain").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported file type. Please upload PDF or DOCX files only."
        );
    }

    #[test]
    fn test_suffix() {
        assert_eq!(pdf_upload(b"").suffix(), ".pdf");
        assert_eq!(Upload::new(None, PDF_MIME, Vec::new()).suffix(), ".pdf");
        assert_eq!(Upload::new(Some("lease.docx".into()), DOCX_MIME, Vec::new()).suffix(), ".docx");
        assert_eq!(Upload::new(Some("contract".into()), PDF_MIME, Vec::new()).suffix(), "");
    }

    #[test]
    fn test_extract_removes_temp_file() {
        let parser = StubDocumentParser::returning("This Agreement is made between...");
        let text = extract_upload_text(&parser, &pdf_upload(b"%PDF-1.4")).unwrap();

        assert_eq!(text, "This Agreement is made between...");
        let seen = parser.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].content_type, ContentType::Pdf);
        assert_eq!(seen[0].bytes, b"%PDF-1.4");
        assert!(seen[0].path.to_string_lossy().ends_with(".pdf"));
        assert!(!seen[0].path.exists());
    }

    #[test]
    fn test_extract_removes_temp_file_on_parse_error() {
        let parser = StubDocumentParser::failing("corrupt xref table");
        let err = extract_upload_text(&parser, &pdf_upload(b"junk")).unwrap_err();

        assert!(matches!(err, CrewflowError::Parse(_)));
        assert!(!parser.seen()[0].path.exists());
    }

    #[test]
    fn test_extract_rejects_blank_text() {
        let parser = StubDocumentParser::returning(" \n\t ");
        let err = extract_upload_text(&parser, &pdf_upload(b"%PDF")).unwrap_err();

        assert!(matches!(err, CrewflowError::Validation(ValidationError::EmptyDocument)));
        assert!(err.is_client_error());
        assert!(!parser.seen()[0].path.exists());
    }

    #[test]
    fn test_extract_rejects_unsupported_type_before_parsing() {
        let parser = StubDocumentParser::returning("text");
        let upload = Upload::new(Some("notes.txt".into()), "text/plain", b"hi".to_vec());
        let err = extract_upload_text(&parser, &upload).unwrap_err();

        assert!(matches!(
            err,
            CrewflowError::Validation(ValidationError::UnsupportedContentType { .. })
        ));
        assert!(parser.seen().is_empty());
    }
}
