//! Route definitions for the `/admin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;
use crate::ws;

/// Routes mounted at `/admin`.
///
/// All routes require the `ReviewComplaints` capability (enforced by handler
/// extractors, or before the upgrade for the WebSocket).
///
/// ```text
/// GET /complaints               -> list_complaints
/// PUT /complaints/{id}/status   -> update_status
/// GET /ws?token=...             -> admin_ws_handler
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/complaints", get(admin::list_complaints))
        .route("/complaints/{id}/status", put(admin::update_status))
        .route("/ws", get(ws::admin_ws_handler))
}
