//! Prompt dispatch: turns session state plus a user action into exactly one
//! backend call.
//!
//! Flow (rephrase): validate input → check credential → build prompt →
//!                  generate → store as the session's rephrased text.
//! Flow (chat):     validate → route on the "customize" prefix → build prompt →
//!                  generate → append to transcript (and overwrite the rephrased
//!                  text on the revision route).
//!
//! Missing-input failures return before anything is mutated or sent.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{BackendConnector, LlmBackend, TextGenerator};
use crate::models::session::{Role, Session};
use crate::rephrase::prompts::{build_customize_prompt, build_rephrase_prompt};
use crate::rephrase::style::StyleParameters;

const CUSTOMIZE_PREFIX: &str = "customize";

/// Which path a chat message takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRoute {
    /// Revise the current rephrased text with the message as instructions.
    Customize,
    /// Send the message to the model as-is.
    Query,
}

/// Routes on a case-insensitive "customize" prefix. Leading whitespace counts,
/// so " customize" is a free-form query.
pub fn route_message(message: &str) -> ChatRoute {
    let is_customize = message
        .get(..CUSTOMIZE_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CUSTOMIZE_PREFIX));
    if is_customize {
        ChatRoute::Customize
    } else {
        ChatRoute::Query
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub route: ChatRoute,
    pub response: String,
    /// The session's rephrased text after this message.
    pub rephrased_text: Option<String>,
}

/// Rephrases text in the given style and stores the result.
///
/// `new_input`, when given, replaces the session's input text, but only once
/// the request has passed validation.
pub async fn rephrase(
    session: &mut Session,
    connector: &dyn BackendConnector,
    params: &StyleParameters,
    new_input: Option<String>,
) -> Result<String, AppError> {
    let input = new_input.as_deref().unwrap_or(session.input_text());
    if input.trim().is_empty() {
        return Err(AppError::MissingInput(
            "Please provide text to rephrase".to_string(),
        ));
    }

    let generator = ready_generator(session.backend(), connector)?;
    let prompt = build_rephrase_prompt(input, params);
    if let Some(text) = new_input {
        session.set_input_text(text);
    }

    info!(
        "Rephrasing session {} in {} style with {}",
        session.id,
        params.style(),
        generator.model()
    );

    let rephrased = generator.generate(&prompt).await.map_err(|e| {
        warn!("Rephrase failed for session {}: {e}", session.id);
        AppError::Llm(e)
    })?;

    session.set_rephrased_text(rephrased.clone());
    Ok(rephrased)
}

/// Handles one chat message. The user message is recorded once validation
/// passes, so it stays in the transcript even if the backend call fails.
pub async fn chat(
    session: &mut Session,
    connector: &dyn BackendConnector,
    message: &str,
) -> Result<ChatReply, AppError> {
    if message.trim().is_empty() {
        return Err(AppError::MissingInput("Please enter a message".to_string()));
    }

    let route = route_message(message);
    let generator = ready_generator(session.backend(), connector)?;

    let prompt = match route {
        ChatRoute::Customize => {
            let current = session.rephrased_text().ok_or_else(|| {
                AppError::MissingInput("Rephrase some text before customizing it".to_string())
            })?;
            build_customize_prompt(message, current)
        }
        ChatRoute::Query => message.to_string(),
    };

    info!(
        "Chat message for session {} routed to {:?} with {}",
        session.id,
        route,
        generator.model()
    );

    session.push_message(Role::User, message);

    let response = generator.generate(&prompt).await.map_err(|e| {
        warn!("Chat request failed for session {}: {e}", session.id);
        AppError::Llm(e)
    })?;

    if route == ChatRoute::Customize {
        session.set_rephrased_text(response.clone());
    }
    session.push_message(Role::Assistant, response.clone());

    Ok(ChatReply {
        route,
        response,
        rephrased_text: session.rephrased_text().map(str::to_string),
    })
}

/// Refuses hosted backends without a key before anything is sent.
fn ready_generator(
    backend: &LlmBackend,
    connector: &dyn BackendConnector,
) -> Result<std::sync::Arc<dyn TextGenerator>, AppError> {
    if !backend.is_ready() {
        return Err(AppError::MissingInput(format!(
            "An API key is required for {}",
            backend.option.label()
        )));
    }
    Ok(connector.connect(backend)?)
}
