use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::BackendConnector;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Turns a session's backend descriptor into a live client. Swapped for a fake in tests.
    pub connector: Arc<dyn BackendConnector>,
    pub sessions: SessionStore,
}
