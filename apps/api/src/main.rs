mod config;
mod documents;
mod errors;
mod llm_client;
mod models;
mod rephrase;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::HttpConnector;
use crate::routes::build_router;
use crate::session::store::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Rephraser API v{}", env!("CARGO_PKG_VERSION"));

    if config.google_api_key.is_some() {
        info!("Google API key loaded; hosted model: {}", config.gemini_model);
    } else {
        warn!("GOOGLE_API_KEY not set; the hosted backend needs a per-session key");
    }

    let connector = HttpConnector::new(&config)?;
    info!("LLM connector initialized (ollama: {})", config.ollama_url);

    let sessions = SessionStore::default();
    sessions.spawn_idle_sweeper(Duration::from_secs(config.session_idle_secs));
    info!("Idle sessions expire after {}s", config.session_idle_secs);

    let state = AppState {
        config: config.clone(),
        connector: Arc::new(connector),
        sessions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
