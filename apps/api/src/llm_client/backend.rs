//! Backend descriptors: the fixed list of selectable models and the per-session
//! descriptor built from one of them.

use serde::{Deserialize, Serialize};

use crate::llm_client::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Remote API that needs a credential.
    Hosted,
    /// Model served by a local Ollama daemon.
    Local,
}

/// One entry of the backend picker. The hosted model name comes from config;
/// local model tags are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendOption {
    GoogleGemini,
    OllamaPhi3,
    OllamaLlama3,
    OllamaMistral,
    OllamaMixtral,
    OllamaVicuna,
}

impl BackendOption {
    pub const ALL: [BackendOption; 6] = [
        BackendOption::GoogleGemini,
        BackendOption::OllamaPhi3,
        BackendOption::OllamaLlama3,
        BackendOption::OllamaMistral,
        BackendOption::OllamaMixtral,
        BackendOption::OllamaVicuna,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BackendOption::GoogleGemini => "Google Generative AI (Gemini)",
            BackendOption::OllamaPhi3 => "Ollama (Phi-3)",
            BackendOption::OllamaLlama3 => "Ollama (LLaMA-3)",
            BackendOption::OllamaMistral => "Ollama (Mistral)",
            BackendOption::OllamaMixtral => "Ollama (Mixtral)",
            BackendOption::OllamaVicuna => "Ollama (Vicuna)",
        }
    }

    pub fn kind(self) -> BackendKind {
        match self {
            BackendOption::GoogleGemini => BackendKind::Hosted,
            _ => BackendKind::Local,
        }
    }

    /// Ollama model tag for local options; `None` for the hosted option.
    pub fn local_model(self) -> Option<&'static str> {
        match self {
            BackendOption::GoogleGemini => None,
            BackendOption::OllamaPhi3 => Some("phi3"),
            BackendOption::OllamaLlama3 => Some("llama3"),
            BackendOption::OllamaMistral => Some("mistral"),
            BackendOption::OllamaMixtral => Some("mixtral"),
            BackendOption::OllamaVicuna => Some("vicuna"),
        }
    }

    /// Builds the session descriptor. The credential is dropped for local models.
    pub fn descriptor(self, hosted_model: &str, credential: Option<String>) -> LlmBackend {
        match self.local_model() {
            Some(model) => LlmBackend {
                option: self,
                kind: BackendKind::Local,
                model: model.to_string(),
                credential: None,
            },
            None => LlmBackend {
                option: self,
                kind: BackendKind::Hosted,
                model: hosted_model.to_string(),
                credential: credential.filter(|c| !c.trim().is_empty()),
            },
        }
    }
}

/// The backend a session dispatches to. Built once when the session starts.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmBackend {
    pub option: BackendOption,
    pub kind: BackendKind,
    pub model: String,
    credential: Option<String>,
}

impl LlmBackend {
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Whether a request can be sent at all. Hosted backends need a key.
    pub fn is_ready(&self) -> bool {
        match self.kind {
            BackendKind::Hosted => self.has_credential(),
            BackendKind::Local => true,
        }
    }

    pub fn credential(&self) -> Result<&str, LlmError> {
        self.credential
            .as_deref()
            .ok_or_else(|| LlmError::MissingCredential {
                model: self.model.clone(),
            })
    }

    pub fn summary(&self) -> BackendSummary {
        BackendSummary {
            id: self.option,
            label: self.option.label(),
            kind: self.kind,
            model: self.model.clone(),
            ready: self.is_ready(),
        }
    }
}

impl std::fmt::Debug for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmBackend")
            .field("option", &self.option)
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("has_credential", &self.has_credential())
            .finish()
    }
}

/// Credential-free view of a backend, safe to return to clients.
#[derive(Debug, Clone, Serialize)]
pub struct BackendSummary {
    pub id: BackendOption,
    pub label: &'static str,
    pub kind: BackendKind,
    pub model: String,
    pub ready: bool,
}
