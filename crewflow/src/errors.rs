//! Error types for the crewflow pipelines.
//!
//! Input validation failures, model failures, collaborator failures and
//! context misuse each get their own type. [`CrewflowError`] wraps what the
//! library's public operations can return; model and configuration errors
//! surface on their own, since stages absorb the former and clients are
//! built from the latter.

use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for crewflow operations.
#[derive(Debug, Error)]
pub enum CrewflowError {
    /// The input was rejected before any stage ran.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The document parser collaborator failed.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The report renderer collaborator failed.
    #[error("{0}")]
    Render(#[from] RenderError),

    /// A context field was written twice.
    #[error("{0}")]
    DataConflict(#[from] DataConflictError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrewflowError {
    /// Returns true if the error was caused by the caller's input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns a short type tag for the error.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Parse(_) => "ParseError",
            Self::Render(_) => "RenderError",
            Self::DataConflict(_) => "DataConflictError",
            Self::Io(_) => "IoError",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), json!(self.kind()));
        map.insert("message".to_string(), json!(self.to_string()));
        map
    }
}

/// Input rejected before a pipeline starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The uploaded file is neither PDF nor DOCX.
    #[error("Unsupported file type. Please upload PDF or DOCX files only.")]
    UnsupportedContentType {
        /// The rejected MIME type.
        content_type: String,
    },

    /// Text extraction produced nothing usable.
    #[error("Could not extract text from document")]
    EmptyDocument,

    /// The symptom description was blank.
    #[error("Please provide a symptom description.")]
    EmptySymptoms,

    /// A guided symptom form was submitted without its main symptom.
    #[error("Please enter your main symptom.")]
    MissingMainSymptom,

    /// A guided symptom form rated severity outside 1 to 10.
    #[error("Severity must be between 1 and 10, got {severity}.")]
    SeverityOutOfRange {
        /// The rejected rating.
        severity: u8,
    },

    /// A guided symptom form field received a value it does not offer.
    #[error("Unknown {field} '{value}'. Expected one of: {expected}.")]
    UnknownChoice {
        /// The form field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Accepted values, comma-separated.
        expected: String,
    },
}

/// Errors raised by a [`crate::model::ModelClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The request never produced an HTTP response.
    #[error("Model request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("Model request failed ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the endpoint.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Failed to parse model response: {0}")]
    Decode(String),

    /// The response contained no choices.
    #[error("Model response contained no choices")]
    EmptyChoices,

    /// Any other failure reported by a client implementation.
    #[error("{0}")]
    Other(String),
}

impl ModelError {
    /// Creates an error from a free-form message.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Returns true if the endpoint reported a quota or rate limit.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { status: 429, .. })
    }
}

/// Error raised by a [`crate::document::DocumentParser`].
#[derive(Debug, Clone, Error)]
#[error("Document parsing failed: {message}")]
pub struct ParseError {
    /// The error message.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error raised by a [`crate::report::ReportRenderer`].
#[derive(Debug, Clone, Error)]
#[error("Report generation failed: {message}")]
pub struct RenderError {
    /// The error message.
    pub message: String,
}

impl RenderError {
    /// Creates a new render error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No API key was found for the model endpoint.
    #[error("Missing model API key: set GROQ_API_KEY")]
    MissingApiKey,

    /// A field holds an unusable value.
    #[error("Invalid configuration for '{field}': {reason}")]
    Invalid {
        /// The offending field.
        field: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Creates an invalid-field error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error raised when writing to an existing key in a pipeline context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Data conflict: key '{key}' already exists")]
pub struct DataConflictError {
    /// The conflicting key.
    pub key: String,
}

impl DataConflictError {
    /// Creates a new data conflict error.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::UnsupportedContentType {
            content_type: "text/plain".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported file type. Please upload PDF or DOCX files only."
        );
        assert_eq!(
            ValidationError::EmptyDocument.to_string(),
            "Could not extract text from document"
        );
    }

    #[test]
    fn test_client_error_classification() {
        let err: CrewflowError = ValidationError::EmptyDocument.into();
        assert!(err.is_client_error());

        let err: CrewflowError = RenderError::new("disk full").into();
        assert!(!err.is_client_error());
        assert_eq!(err.kind(), "RenderError");
    }

    #[test]
    fn test_to_dict() {
        let err: CrewflowError = ParseError::new("corrupt xref table").into();
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "ParseError");
        assert_eq!(
            dict.get("message").unwrap(),
            "Document parsing failed: corrupt xref table"
        );
    }

    #[test]
    fn test_model_error_rate_limited() {
        let err = ModelError::Status {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("429"));
        assert!(!ModelError::other("boom").is_rate_limited());
    }

    #[test]
    fn test_data_conflict_error() {
        let err = DataConflictError::new("risk_assessment");
        assert_eq!(err.to_string(), "Data conflict: key 'risk_assessment' already exists");
    }
}
