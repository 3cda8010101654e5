use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::documents::{extract_text, DocumentError, DocumentKind};
use crate::errors::AppError;
use crate::llm_client::backend::{BackendKind, BackendOption, BackendSummary};
use crate::models::session::{ChatMessage, SessionSnapshot};
use crate::session::exports::{all_exports, Export, ExportFormat};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub backend: BackendOption,
    /// Used when no key is configured in the environment.
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub backend: BackendSummary,
}

#[derive(Debug, Serialize)]
pub struct BackendOptionResponse {
    pub id: BackendOption,
    pub label: &'static str,
    pub kind: BackendKind,
    pub model: String,
    /// Hosted options are only usable out of the box with a configured key.
    pub requires_api_key: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetInputRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct DownloadOption {
    pub format: ExportFormat,
    pub filename: &'static str,
    pub label: &'static str,
    pub size_bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub extracted_text: String,
}

/// GET /api/v1/backends
pub async fn handle_list_backends(State(state): State<AppState>) -> Json<Vec<BackendOptionResponse>> {
    let has_key = state.config.google_api_key.is_some();
    let options = BackendOption::ALL
        .iter()
        .map(|&option| {
            let backend = option.descriptor(&state.config.gemini_model, None);
            BackendOptionResponse {
                id: option,
                label: option.label(),
                kind: option.kind(),
                model: backend.model,
                requires_api_key: option.kind() == BackendKind::Hosted && !has_key,
            }
        })
        .collect();
    Json(options)
}

/// POST /api/v1/sessions
///
/// The backend is fixed for the session's lifetime. A request-supplied key
/// takes precedence over the configured one.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let credential = request
        .api_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| state.config.google_api_key.clone());
    let backend = request
        .backend
        .descriptor(&state.config.gemini_model, credential);
    let summary = backend.summary();

    let (session_id, _) = state.sessions.create(backend);
    info!(
        "Session {session_id} created with {} ({} active)",
        summary.model,
        state.sessions.active_count()
    );

    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            backend: summary,
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(session_id)?;
    let snapshot = handle.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(session_id) {
        info!("Session {session_id} ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}

/// PUT /api/v1/sessions/:id/input
pub async fn handle_set_input(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SetInputRequest>,
) -> Result<StatusCode, AppError> {
    let handle = state.sessions.get(session_id)?;
    handle.lock().await.set_input_text(request.text);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/upload
///
/// Takes the first file field, extracts its text, and makes it the session's input.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let handle = state.sessions.get(session_id)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::MissingInput("Please choose a file to upload".to_string()))?;
    let kind = DocumentKind::from_filename(&filename);

    let extracted_text = tokio::task::spawn_blocking(move || extract_text(kind, &bytes))
        .await
        .map_err(|e| {
            if e.is_panic() {
                AppError::Document(DocumentError::Unreadable(kind))
            } else {
                AppError::Internal(anyhow::anyhow!("Document extraction task failed: {e}"))
            }
        })??;

    info!(
        "Session {session_id}: extracted {} chars from {filename} ({kind:?})",
        extracted_text.chars().count()
    );

    handle.lock().await.set_input_text(extracted_text.clone());

    Ok(Json(UploadResponse {
        filename,
        extracted_text,
    }))
}

/// GET /api/v1/sessions/:id/transcript
pub async fn handle_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let handle = state.sessions.get(session_id)?;
    let transcript = handle.lock().await.transcript().to_vec();
    Ok(Json(transcript))
}

/// GET /api/v1/sessions/:id/downloads
pub async fn handle_list_downloads(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<DownloadOption>>, AppError> {
    let handle = state.sessions.get(session_id)?;
    let session = handle.lock().await;
    let options = session
        .rephrased_text()
        .map(|text| {
            all_exports(text)
                .into_iter()
                .map(|export| DownloadOption {
                    format: export.format,
                    filename: export.format.filename(),
                    label: export.format.label(),
                    size_bytes: export.body.len(),
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(Json(options))
}

/// GET /api/v1/sessions/:id/download/:format
pub async fn handle_download(
    State(state): State<AppState>,
    Path((session_id, format)): Path<(Uuid, ExportFormat)>,
) -> Result<Response, AppError> {
    let handle = state.sessions.get(session_id)?;
    let session = handle.lock().await;
    let text = session
        .rephrased_text()
        .ok_or_else(|| AppError::NotFound("Nothing has been rephrased yet".to_string()))?;

    let export = Export::new(format, text);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, export.content_disposition()),
        ],
        export.body,
    )
        .into_response())
}
