//! Local backend: Ollama's non-streaming `/api/generate`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm_client::{error_from_response, LlmError, TextGenerator};

pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(client: Client, base_url: &str, model: &str) -> Self {
        Self {
            client,
            endpoint: format!("{base_url}/api/generate"),
            model: model.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
    pub prompt_eval_count: Option<u32>,
    pub eval_count: Option<u32>,
}

impl GenerateResponse {
    /// The generated text, or `None` when the model produced nothing but whitespace.
    pub fn into_text(self) -> Option<String> {
        (!self.response.trim().is_empty()).then_some(self.response)
    }
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

fn ollama_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<OllamaError>(body).ok().map(|e| e.error)
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, ollama_error_message).await);
        }

        let body: GenerateResponse = response.json().await?;
        debug!(
            "Ollama call succeeded: model={}, prompt_tokens={:?}, output_tokens={:?}",
            self.model, body.prompt_eval_count, body.eval_count
        );

        body.into_text().ok_or(LlmError::EmptyContent)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_generate_response() {
        let body = r#"{"model":"mistral","response":"A calmer sentence.","done":true,"eval_count":7}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response, "A calmer sentence.");
        assert_eq!(parsed.eval_count, Some(7));
        assert_eq!(parsed.prompt_eval_count, None);
    }

    #[test]
    fn test_empty_or_missing_response_has_no_text() {
        let missing: GenerateResponse = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(missing.into_text().is_none());

        let blank: GenerateResponse =
            serde_json::from_str(r#"{"response":"  \n","done":true}"#).unwrap();
        assert!(blank.into_text().is_none());

        let filled: GenerateResponse = serde_json::from_str(r#"{"response":"Done."}"#).unwrap();
        assert_eq!(filled.into_text().as_deref(), Some("Done."));
    }

    #[test]
    fn test_error_message_extracted() {
        let body = r#"{"error":"model 'vicuna' not found, try pulling it first"}"#;
        assert_eq!(
            ollama_error_message(body).as_deref(),
            Some("model 'vicuna' not found, try pulling it first")
        );
    }

    #[test]
    fn test_endpoint_path() {
        let client = OllamaClient::new(Client::new(), "http://localhost:11434", "phi3");
        assert_eq!(client.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(client.model(), "phi3");
    }
}
