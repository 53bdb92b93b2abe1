use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::ObjectStore;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: filmcraft_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Change-notification bus; every mutation publishes here.
    pub event_bus: Arc<filmcraft_events::EventBus>,
    /// Backend for the `shot-images` bucket.
    pub object_store: Arc<dyn ObjectStore>,
}
