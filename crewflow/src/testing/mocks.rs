//! Scripted collaborators for testing pipelines.

use crate::document::{ContentType, DocumentParser};
use crate::errors::{ModelError, ParseError};
use crate::model::{ModelClient, ModelRequest, ModelResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// A model client that replays a queue of canned outcomes.
///
/// Each call pops the next outcome; once the queue is empty every call
/// fails. All requests are recorded.
#[derive(Debug, Default)]
pub struct ScriptedModelClient {
    script: Mutex<VecDeque<Result<String, ModelError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModelClient {
    /// Creates a client with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client that answers with `texts`, in order.
    #[must_use]
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .fold(Self::new(), |client, text| client.push_text(text))
    }

    /// Appends a successful response.
    #[must_use]
    pub fn push_text(self, text: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(text.into()));
        self
    }

    /// Appends a failure.
    #[must_use]
    pub fn push_error(self, error: ModelError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().clone()
    }

    /// Returns the prompt of the `index`-th call.
    #[must_use]
    pub fn prompt(&self, index: usize) -> Option<String> {
        self.requests.lock().get(index).map(|r| r.prompt.clone())
    }

    /// Returns the number of outcomes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        self.requests.lock().push(request.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::other("script exhausted")))
            .map(|text| {
                let mut response = ModelResponse::new(text);
                response.model = "scripted".to_string();
                response
            })
    }
}

/// One call received by [`StubDocumentParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCall {
    /// Path the parser was handed.
    pub path: PathBuf,
    /// Declared content type.
    pub content_type: ContentType,
    /// File contents at the time of the call.
    pub bytes: Vec<u8>,
}

/// A document parser that returns fixed text and records what it saw.
#[derive(Debug)]
pub struct StubDocumentParser {
    outcome: Result<String, ParseError>,
    seen: Mutex<Vec<ParseCall>>,
}

impl StubDocumentParser {
    /// Creates a parser that returns `text` for every file.
    #[must_use]
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Creates a parser that fails every call.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(ParseError::new(message)),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Returns the calls received, in order.
    #[must_use]
    pub fn seen(&self) -> Vec<ParseCall> {
        self.seen.lock().clone()
    }
}

impl DocumentParser for StubDocumentParser {
    fn parse(&self, path: &Path, content_type: ContentType) -> Result<String, ParseError> {
        self.seen.lock().push(ParseCall {
            path: path.to_path_buf(),
            content_type,
            bytes: std::fs::read(path).unwrap_or_default(),
        });
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_client_replays_in_order() {
        let client = ScriptedModelClient::with_texts(["first", "second"])
            .push_error(ModelError::other("down"));

        let request = ModelRequest::new("sys", "p1");
        assert_eq!(client.complete(&request).await.unwrap().content, "first");
        assert_eq!(client.complete(&request).await.unwrap().content, "second");
        assert_eq!(client.complete(&request).await.unwrap_err(), ModelError::other("down"));
        assert!(client.complete(&request).await.is_err());

        assert_eq!(client.call_count(), 4);
        assert_eq!(client.remaining(), 0);
        assert_eq!(client.prompt(0).as_deref(), Some("p1"));
    }
}
