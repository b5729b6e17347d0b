//! Configuration types for model access and pipeline tuning.
//!
//! Configuration is built once at process start and passed by reference to
//! whatever needs it. Pipeline code never looks at the environment.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the model API key.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";
/// Older spelling of [`API_KEY_VAR`], still honoured.
pub const LEGACY_API_KEY_VAR: &str = "Groq_key";
/// Environment variable overriding the model name.
pub const MODEL_VAR: &str = "CREWFLOW_MODEL";
/// Environment variable overriding the endpoint base URL.
pub const BASE_URL_VAR: &str = "CREWFLOW_BASE_URL";

/// Configuration for the hosted language model.
#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Bearer key for the endpoint.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on generated tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_timeout() -> f64 {
    120.0
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
        }
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ModelConfig {
    /// Creates a new model configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if no key variable is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR)
            .or_else(|| non_empty(LEGACY_API_KEY_VAR))
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::default().with_api_key(api_key);
        if let Some(model) = non_empty(MODEL_VAR) {
            config.model = model;
        }
        if let Some(base_url) = non_empty(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Gets timeout as Duration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `timeout_seconds` is not a
    /// positive number of seconds that fits in a [`Duration`].
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        match Duration::try_from_secs_f64(self.timeout_seconds) {
            Ok(timeout) if !timeout.is_zero() => Ok(timeout),
            Ok(_) => Err(ConfigError::invalid("timeout_seconds", "must be positive")),
            Err(err) => Err(ConfigError::invalid("timeout_seconds", err.to_string())),
        }
    }

    /// Returns the chat-completions URL.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Checks the configuration for unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("model", "must not be empty"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::invalid("base_url", "must be an http(s) URL"));
        }
        self.timeout()?;
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid("temperature", "must be between 0 and 2"));
        }
        Ok(())
    }
}

/// Tuning for the contract-analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPipelineConfig {
    /// Characters of contract text forwarded to the suggestion stage.
    #[serde(default = "default_source_excerpt")]
    pub source_excerpt_chars: usize,
    /// Characters of risk output forwarded to the suggestion stage.
    #[serde(default = "default_risk_excerpt")]
    pub risk_excerpt_chars: usize,
}

fn default_source_excerpt() -> usize {
    2000
}

fn default_risk_excerpt() -> usize {
    1000
}

impl Default for DocumentPipelineConfig {
    fn default() -> Self {
        Self {
            source_excerpt_chars: default_source_excerpt(),
            risk_excerpt_chars: default_risk_excerpt(),
        }
    }
}

/// Top-level configuration bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrewflowConfig {
    /// Model access.
    #[serde(default)]
    pub model: ModelConfig,
    /// Contract pipeline tuning.
    #[serde(default)]
    pub document: DocumentPipelineConfig,
}

impl CrewflowConfig {
    /// Builds the bundle from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            model: ModelConfig::from_env()?,
            document: DocumentPipelineConfig::default(),
        })
    }
}
