//! Client for OpenAI-compatible chat-completion endpoints (Groq by default).

use super::{ModelClient, ModelRequest, ModelResponse};
use crate::config::ModelConfig;
use crate::errors::{ConfigError, ModelError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
}

/// Calls `POST {base_url}/chat/completions` once per request.
pub struct OpenAiChatClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiChatClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the key is missing, the configuration is
    /// invalid, or the HTTP client cannot be built.
    pub fn new(config: &ModelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let api_key = config.api_key.clone().ok_or(ConfigError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout()?)
            .build()
            .map_err(|e| ConfigError::invalid("http_client", e.to_string()))?;

        Ok(Self {
            client,
            url: config.completions_url(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Returns the model name sent with every request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, request: &'a ModelRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        }
    }
}

impl std::fmt::Debug for OpenAiChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatClient")
            .field("url", &self.url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

fn parse_completion(body: &str) -> Result<ModelResponse, ModelError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Decode(e.to_string()))?;

    let choice = parsed.choices.into_iter().next().ok_or(ModelError::EmptyChoices)?;
    let usage = parsed.usage;

    Ok(ModelResponse {
        content: choice.message.content.unwrap_or_default(),
        model: parsed.model,
        input_tokens: usage.as_ref().and_then(|u| u.prompt_tokens),
        output_tokens: usage.as_ref().and_then(|u| u.completion_tokens),
        latency_ms: None,
        finish_reason: choice.finish_reason,
    })
}

#[async_trait]
impl ModelClient for OpenAiChatClient {
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        let start = Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut response = parse_completion(&body)?;
        response.latency_ms = Some(start.elapsed().as_secs_f64() * 1000.0);

        debug!(
            model = %response.model,
            total_tokens = response.total_tokens(),
            latency_ms = response.latency_ms,
            "Model call completed"
        );

        Ok(response)
    }
}
