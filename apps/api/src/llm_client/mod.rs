//! LLM Client: the single point of entry for all model calls in the rephraser.
//!
//! ARCHITECTURAL RULE: no other module talks to a provider API directly.
//! Handlers hold a `BackendConnector`, turn the session's `LlmBackend` into a
//! `TextGenerator`, and call `generate`. There is no retry layer: a failed call
//! is reported to the caller exactly once.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

pub mod backend;
pub mod gemini;
pub mod ollama;
pub mod prompts;

pub use backend::{BackendKind, BackendOption, LlmBackend};

use crate::config::Config;
use crate::llm_client::gemini::GeminiClient;
use crate::llm_client::ollama::OllamaClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No API key configured for {model}")]
    MissingCredential { model: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A configured model that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    fn model(&self) -> &str;
}

/// Builds a `TextGenerator` for a backend descriptor.
///
/// Carried in `AppState` as `Arc<dyn BackendConnector>` so tests can swap in a fake.
pub trait BackendConnector: Send + Sync {
    fn connect(&self, backend: &LlmBackend) -> Result<Arc<dyn TextGenerator>, LlmError>;
}

/// Production connector: one shared HTTP client for every provider.
#[derive(Clone)]
pub struct HttpConnector {
    client: Client,
    gemini_api_url: String,
    ollama_url: String,
}

impl HttpConnector {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            gemini_api_url: config.gemini_api_url.trim_end_matches('/').to_string(),
            ollama_url: config.ollama_url.trim_end_matches('/').to_string(),
        })
    }
}

impl BackendConnector for HttpConnector {
    fn connect(&self, backend: &LlmBackend) -> Result<Arc<dyn TextGenerator>, LlmError> {
        match backend.kind {
            BackendKind::Hosted => {
                let api_key = backend.credential()?;
                Ok(Arc::new(GeminiClient::new(
                    self.client.clone(),
                    &self.gemini_api_url,
                    &backend.model,
                    api_key,
                )))
            }
            BackendKind::Local => Ok(Arc::new(OllamaClient::new(
                self.client.clone(),
                &self.ollama_url,
                &backend.model,
            ))),
        }
    }
}

/// Reads a failed response body, preferring the provider's own error message.
async fn error_from_response<F>(response: reqwest::Response, extract: F) -> LlmError
where
    F: Fn(&str) -> Option<String>,
{
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = extract(&body).unwrap_or(body);
    LlmError::Api { status, message }
}
