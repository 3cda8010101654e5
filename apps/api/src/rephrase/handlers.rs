//! Axum route handlers for rephrasing and chat.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::rephrase::dispatcher::{self, ChatReply};
use crate::rephrase::style::{customization_string, RephraseStyle, StyleParameters};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RephraseRequest {
    /// Replaces the session's input text before rephrasing, if present.
    pub text: Option<String>,
    pub parameters: StyleParameters,
}

#[derive(Debug, Serialize)]
pub struct RephraseResponse {
    pub style: RephraseStyle,
    pub customizations: String,
    pub rephrased_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StyleCatalogEntry {
    pub style: RephraseStyle,
    pub label: &'static str,
    pub defaults: StyleParameters,
    pub customizations: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/styles
///
/// Every style with the parameters a fresh form starts from.
pub async fn handle_list_styles() -> Json<Vec<StyleCatalogEntry>> {
    let entries = RephraseStyle::ALL
        .iter()
        .map(|&style| {
            let defaults = StyleParameters::defaults_for(style);
            StyleCatalogEntry {
                style,
                label: style.label(),
                customizations: customization_string(Some(&defaults)),
                defaults,
            }
        })
        .collect();
    Json(entries)
}

/// POST /api/v1/sessions/:id/rephrase
pub async fn handle_rephrase(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<RephraseRequest>,
) -> Result<Json<RephraseResponse>, AppError> {
    let handle = state.sessions.get(session_id)?;
    let mut session = handle.lock().await;

    let rephrased_text = dispatcher::rephrase(
        &mut session,
        state.connector.as_ref(),
        &request.parameters,
        request.text,
    )
    .await?;

    Ok(Json(RephraseResponse {
        style: request.parameters.style(),
        customizations: customization_string(Some(&request.parameters)),
        rephrased_text,
    }))
}

/// POST /api/v1/sessions/:id/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let handle = state.sessions.get(session_id)?;
    let mut session = handle.lock().await;

    let reply = dispatcher::chat(&mut session, state.connector.as_ref(), &request.message).await?;
    Ok(Json(reply))
}
