pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::rephrase::handlers as rephrase;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/backends", get(session::handle_list_backends))
        .route("/api/v1/styles", get(rephrase::handle_list_styles))
        // Session lifecycle
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/input", put(session::handle_set_input))
        .route(
            "/api/v1/sessions/:id/upload",
            post(session::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Rephrasing and chat
        .route("/api/v1/sessions/:id/rephrase", post(rephrase::handle_rephrase))
        .route("/api/v1/sessions/:id/chat", post(rephrase::handle_chat))
        .route(
            "/api/v1/sessions/:id/transcript",
            get(session::handle_transcript),
        )
        // Downloads
        .route(
            "/api/v1/sessions/:id/downloads",
            get(session::handle_list_downloads),
        )
        .route(
            "/api/v1/sessions/:id/download/:format",
            get(session::handle_download),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::documents::testing::pdf_without_media_box;
    use crate::rephrase::dispatcher::testing::FakeConnector;
    use crate::session::store::SessionStore;

    fn app(connector: FakeConnector, config: Config) -> Router {
        build_router(AppState {
            config,
            connector: Arc::new(connector),
            sessions: SessionStore::default(),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_session(app: &Router, backend: &str) -> String {
        let response = send(app, "POST", "/api/v1/sessions", Some(json!({ "backend": backend }))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(FakeConnector::replying("x"), Config::default());
        let response = send(&app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_backends_flag_missing_key() {
        let app = app(FakeConnector::replying("x"), Config::default());
        let body = body_json(send(&app, "GET", "/api/v1/backends", None).await).await;
        let options = body.as_array().unwrap();
        assert_eq!(options.len(), 6);
        assert_eq!(options[0]["id"], "google_gemini");
        assert_eq!(options[0]["requires_api_key"], true);
        assert_eq!(options[1]["model"], "phi3");
        assert_eq!(options[1]["requires_api_key"], false);
    }

    #[tokio::test]
    async fn test_styles_catalog() {
        let app = app(FakeConnector::replying("x"), Config::default());
        let body = body_json(send(&app, "GET", "/api/v1/styles", None).await).await;
        let styles = body.as_array().unwrap();
        assert_eq!(styles.len(), 6);
        assert_eq!(styles[0]["label"], "Formal");
        assert_eq!(styles[0]["defaults"]["style"], "formal");
        assert_eq!(
            styles[0]["customizations"],
            "Formality Level: 3/5, Professionalism: Business"
        );
    }

    #[tokio::test]
    async fn test_rephrase_then_download_all_formats() {
        let connector = FakeConnector::replying("Kindly find the report attached.");
        let app = app(connector.clone(), Config::default());
        let id = create_session(&app, "ollama_mistral").await;

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/rephrase"),
            Some(json!({
                "text": "here's the report",
                "parameters": {"style": "formal", "formality_level": 5}
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["rephrased_text"], "Kindly find the report attached.");
        assert_eq!(body["style"], "formal");
        assert_eq!(
            body["customizations"],
            "Formality Level: 5/5, Professionalism: Business"
        );

        let mut bodies = Vec::new();
        for format in ["txt", "md", "docx"] {
            let response = send(
                &app,
                "GET",
                &format!("/api/v1/sessions/{id}/download/{format}"),
                None,
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
            let disposition = response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .to_string();
            assert!(disposition.contains(&format!("rephrased_text.{format}")));
            bodies.push(to_bytes(response.into_body(), usize::MAX).await.unwrap());
        }
        assert!(bodies.iter().all(|b| b == &bodies[0]));
        assert_eq!(bodies[0].as_ref(), b"Kindly find the report attached.");

        let listing = body_json(
            send(&app, "GET", &format!("/api/v1/sessions/{id}/downloads"), None).await,
        )
        .await;
        assert_eq!(listing.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_rephrase_without_text_is_bad_request() {
        let connector = FakeConnector::replying("unused");
        let app = app(connector.clone(), Config::default());
        let id = create_session(&app, "ollama_phi3").await;

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/rephrase"),
            Some(json!({"parameters": {"style": "simple"}})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "MISSING_INPUT");
        assert_eq!(connector.connects(), 0);
    }

    #[tokio::test]
    async fn test_hosted_session_without_key_cannot_rephrase() {
        let connector = FakeConnector::replying("unused");
        let app = app(connector.clone(), Config::default());
        let id = create_session(&app, "google_gemini").await;

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/rephrase"),
            Some(json!({"text": "hello", "parameters": {"style": "casual"}})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(connector.connects(), 0);
    }

    #[tokio::test]
    async fn test_session_key_enables_hosted_backend() {
        let connector = FakeConnector::replying("Hey there!");
        let app = app(connector.clone(), Config::default());
        let response = send(
            &app,
            "POST",
            "/api/v1/sessions",
            Some(json!({"backend": "google_gemini", "api_key": "user-key"})),
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["backend"]["ready"], true);
        assert!(!body.to_string().contains("user-key"));
        let id = body["session_id"].as_str().unwrap().to_string();

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/rephrase"),
            Some(json!({"text": "hello", "parameters": {"style": "casual"}})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_configured_key_enables_hosted_backend() {
        let config = Config {
            google_api_key: Some("env-key".to_string()),
            ..Config::default()
        };
        let app = app(FakeConnector::replying("x"), config);
        let response = send(&app, "POST", "/api/v1/sessions", Some(json!({"backend": "google_gemini"}))).await;
        assert_eq!(body_json(response).await["backend"]["ready"], true);
    }

    #[tokio::test]
    async fn test_chat_routes_and_transcript() {
        let connector = FakeConnector::replying("Revised.");
        let app = app(connector.clone(), Config::default());
        let id = create_session(&app, "ollama_vicuna").await;

        send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/rephrase"),
            Some(json!({"text": "draft", "parameters": {"style": "creative"}})),
        )
        .await;

        let reply = body_json(
            send(
                &app,
                "POST",
                &format!("/api/v1/sessions/{id}/chat"),
                Some(json!({"message": "Customize creative style: add a metaphor"})),
            )
            .await,
        )
        .await;
        assert_eq!(reply["route"], "customize");
        assert_eq!(reply["rephrased_text"], "Revised.");

        let reply = body_json(
            send(
                &app,
                "POST",
                &format!("/api/v1/sessions/{id}/chat"),
                Some(json!({"message": "Why a metaphor?"})),
            )
            .await,
        )
        .await;
        assert_eq!(reply["route"], "query");

        let transcript = body_json(
            send(&app, "GET", &format!("/api/v1/sessions/{id}/transcript"), None).await,
        )
        .await;
        let transcript = transcript.as_array().unwrap();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[0]["role"], "user");
        assert_eq!(transcript[3]["role"], "assistant");
    }

    #[tokio::test]
    async fn test_backend_failure_is_bad_gateway() {
        let app = app(FakeConnector::failing(), Config::default());
        let id = create_session(&app, "ollama_llama3").await;

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/rephrase"),
            Some(json!({"text": "hello", "parameters": {"style": "academic"}})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Resource has been exhausted"));
    }

    #[tokio::test]
    async fn test_download_before_rephrase_is_not_found() {
        let app = app(FakeConnector::replying("x"), Config::default());
        let id = create_session(&app, "ollama_mixtral").await;
        let response = send(&app, "GET", &format!("/api/v1/sessions/{id}/download/txt"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_set_input_and_snapshot() {
        let app = app(FakeConnector::replying("x"), Config::default());
        let id = create_session(&app, "ollama_phi3").await;

        let response = send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/input"),
            Some(json!({"text": "typed text"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let snapshot = body_json(send(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await).await;
        assert_eq!(snapshot["input_text"], "typed text");
        assert_eq!(snapshot["rephrased_text"], Value::Null);
        assert_eq!(snapshot["backend"]["model"], "phi3");
    }

    async fn upload(app: &Router, id: &str, filename: &str, contents: &[u8]) -> Response {
        let boundary = "XBOUNDARYX";
        let mut body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{id}/upload"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_upload_plain_text_becomes_input() {
        let app = app(FakeConnector::replying("x"), Config::default());
        let id = create_session(&app, "ollama_phi3").await;

        let response = upload(&app, &id, "notes.txt", b"uploaded words").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["extracted_text"], "uploaded words");

        let snapshot = body_json(send(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await).await;
        assert_eq!(snapshot["input_text"], "uploaded words");
    }

    #[tokio::test]
    async fn test_malformed_pdf_upload_is_unprocessable() {
        let app = app(FakeConnector::replying("x"), Config::default());
        let id = create_session(&app, "ollama_phi3").await;
        send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/input"),
            Some(json!({"text": "kept"})),
        )
        .await;

        let response = upload(&app, &id, "report.pdf", &pdf_without_media_box()).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "DOCUMENT_ERROR");

        let snapshot = body_json(send(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await).await;
        assert_eq!(snapshot["input_text"], "kept");
    }

    #[tokio::test]
    async fn test_binary_text_upload_is_unprocessable() {
        let app = app(FakeConnector::replying("x"), Config::default());
        let id = create_session(&app, "ollama_phi3").await;

        let response = upload(&app, &id, "notes.txt", &[0xff, 0xfe, 0x00]).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_deleted_session_is_gone() {
        let app = app(FakeConnector::replying("x"), Config::default());
        let id = create_session(&app, "ollama_phi3").await;

        let response = send(&app, "DELETE", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_level_rejected_by_extractor() {
        let app = app(FakeConnector::replying("x"), Config::default());
        let id = create_session(&app, "ollama_phi3").await;
        let response = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/rephrase"),
            Some(json!({"text": "hi", "parameters": {"style": "casual", "informality_level": 7}})),
        )
        .await;
        assert!(response.status().is_client_error());
    }
}
