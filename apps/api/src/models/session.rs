use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm_client::backend::{BackendSummary, LlmBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Per-user working state: the text being rephrased, the latest result, and the
/// chat transcript. Lives only as long as the session.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    backend: LlmBackend,
    input_text: String,
    rephrased_text: Option<String>,
    transcript: Vec<ChatMessage>,
}

impl Session {
    pub fn new(id: Uuid, backend: LlmBackend) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            backend,
            input_text: String::new(),
            rephrased_text: None,
            transcript: Vec::new(),
        }
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    pub fn rephrased_text(&self) -> Option<&str> {
        self.rephrased_text.as_deref()
    }

    pub fn set_rephrased_text(&mut self, text: impl Into<String>) {
        self.rephrased_text = Some(text.into());
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn push_message(&mut self, role: Role, content: impl Into<String>) {
        self.transcript.push(ChatMessage {
            role,
            content: content.into(),
        });
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            created_at: self.created_at,
            backend: self.backend.summary(),
            input_text: self.input_text.clone(),
            rephrased_text: self.rephrased_text.clone(),
            transcript: self.transcript.clone(),
        }
    }
}

/// Serializable view of a session. Never includes the credential.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub backend: BackendSummary,
    pub input_text: String,
    pub rephrased_text: Option<String>,
    pub transcript: Vec<ChatMessage>,
}
