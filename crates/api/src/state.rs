use std::sync::Arc;

use complaints_events::ChangeFeed;
use complaints_storage::ObjectStore;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: complaints_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Open admin WebSocket connections.
    pub ws_manager: Arc<WsManager>,
    /// Row change notifications, fed by the database listener.
    pub change_feed: Arc<ChangeFeed>,
    /// Attachment storage backend.
    pub object_store: Arc<dyn ObjectStore>,
}
