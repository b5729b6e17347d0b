//! Stage agents.
//!
//! A stage agent is one prompt template bound to a model client. It makes a
//! single call and hands back the raw text; fallback and substitution are
//! the pipelines' business.

mod catalog;
mod prompts;

pub use catalog::{StagePlaceholders, GENERIC_SUGGESTIONS, RISK_UNAVAILABLE_REASON};
pub use prompts::{PromptTemplate, CONTEXT_PLACEHOLDER};

use crate::core::StageName;
use crate::errors::ModelError;
use crate::model::{ModelClient, ModelResponse};
use std::fmt::Debug;
use std::sync::Arc;

/// One prompt plus one model call.
#[derive(Clone)]
pub struct StageAgent {
    name: StageName,
    template: PromptTemplate,
    client: Arc<dyn ModelClient>,
}

impl StageAgent {
    /// Creates an agent with an explicit template.
    #[must_use]
    pub fn new(name: StageName, template: PromptTemplate, client: Arc<dyn ModelClient>) -> Self {
        Self {
            name,
            template,
            client,
        }
    }

    /// Creates an agent with the built-in template for `name`.
    #[must_use]
    pub fn for_stage(name: StageName, client: Arc<dyn ModelClient>) -> Self {
        Self::new(name, PromptTemplate::for_stage(name), client)
    }

    /// Returns the stage name.
    #[must_use]
    pub fn name(&self) -> StageName {
        self.name
    }

    /// Returns the prompt template.
    #[must_use]
    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Calls the model once and returns the full response.
    ///
    /// # Errors
    ///
    /// Propagates the client's [`ModelError`] unchanged.
    pub async fn invoke(&self, context: &str) -> Result<ModelResponse, ModelError> {
        let request = self.template.render(context);
        self.client.complete(&request).await
    }

    /// Calls the model once and returns the raw text output.
    ///
    /// # Errors
    ///
    /// Propagates the client's [`ModelError`] unchanged.
    pub async fn run(&self, context: &str) -> Result<String, ModelError> {
        self.invoke(context).await.map(|response| response.content)
    }
}

impl Debug for StageAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageAgent")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
