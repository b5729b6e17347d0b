//! Language-model invocation.
//!
//! [`ModelClient`] is the seam between the pipelines and whatever hosts the
//! model. A client makes exactly one call per request and never retries;
//! fallback policy belongs to the pipelines.

#[cfg(feature = "http-client")]
mod openai;
mod response;

#[cfg(feature = "http-client")]
pub use openai::OpenAiChatClient;
pub use response::ModelResponse;

use crate::errors::ModelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One instruction for the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRequest {
    /// Persona and standing instructions.
    pub system: String,
    /// The task text, context included.
    pub prompt: String,
}

impl ModelRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
        }
    }
}

/// A hosted language model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends one request and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] on transport, quota or decoding failure.
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError>;
}
