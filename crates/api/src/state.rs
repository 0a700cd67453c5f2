use std::sync::Arc;

use carddesk_core::preview::CardRenderer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: carddesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The external PDF rendering collaborator.
    pub renderer: Arc<dyn CardRenderer>,
}
