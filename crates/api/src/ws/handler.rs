use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use complaints_core::error::CoreError;
use complaints_core::roles::Capability;
use complaints_events::{ChangeEvent, EventMask};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::admin::{load_admin_view, AdminView};
use crate::middleware::auth::{authenticate, AuthUser};
use crate::middleware::rbac::require_capability;
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Table whose changes refresh the admin view.
pub const WATCHED_TABLE: &str = "complaints";

/// Query string of the upgrade request. Browsers cannot set headers on a
/// WebSocket handshake, so the access token travels here.
#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    pub token: Option<String>,
}

/// Server-to-client messages on the admin socket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdminFeedMessage {
    /// Sent once, right after the connection is live.
    Snapshot { data: AdminView },
    /// Sent after every change to a complaint.
    Reload { data: AdminView, change: ChangeEvent },
    /// The view could not be reloaded; the previous one is still shown.
    Error { error: String },
}

/// GET /api/v1/admin/ws?token=...
///
/// Authorization is checked once, before the upgrade, so a denied caller
/// gets the same 401/403 JSON as the REST endpoints.
pub async fn admin_ws_handler(
    State(state): State<AppState>,
    query: Result<Query<WsAuthQuery>, QueryRejection>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> AppResult<Response> {
    let token = query
        .ok()
        .and_then(|Query(q)| q.token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Missing access token".into())))?;

    let admin = authenticate(&state, &token).await?;
    require_capability(&admin, Capability::ReviewComplaints)?;

    let ws = ws.map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, admin)))
}

/// Manage a single admin connection after upgrade.
///
///   1. Registers the connection with `WsManager`.
///   2. Subscribes to complaint changes, then sends the initial snapshot.
///   3. Spawns a sender task that forwards queued messages to the socket.
///   4. Reads inbound frames until the client goes away.
///   5. Releases the subscription and the registration.
async fn handle_socket(socket: WebSocket, state: AppState, admin: AuthUser) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let admin_id = admin.user_id;
    tracing::info!(conn_id = %conn_id, admin_id, "Admin WebSocket connected");

    let mut rx = state.ws_manager.add(conn_id.clone(), admin_id).await;

    // Subscribe before the snapshot so no change can fall between the two.
    // Dropping `subscription` on any exit path stops delivery.
    let subscription = {
        let pool = state.pool.clone();
        let manager = Arc::clone(&state.ws_manager);
        let conn_id = conn_id.clone();
        state
            .change_feed
            .subscribe(WATCHED_TABLE, EventMask::ALL, move |event| {
                let pool = pool.clone();
                let manager = Arc::clone(&manager);
                let conn_id = conn_id.clone();
                async move {
                    push_view(&pool, &manager, &conn_id, Some(event)).await;
                }
            })
    };
    push_view(&state.pool, &state.ws_manager, &conn_id, None).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: the admin view is push-only, inbound frames are ignored.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    subscription.unsubscribe();
    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, admin_id, "Admin WebSocket disconnected");
}

/// Reload the admin view and queue it for `conn_id`.
///
/// `change` is `None` for the initial snapshot.
async fn push_view(pool: &PgPool, manager: &WsManager, conn_id: &str, change: Option<ChangeEvent>) {
    let message = match load_admin_view(pool).await {
        Ok(data) => match change {
            None => AdminFeedMessage::Snapshot { data },
            Some(change) => AdminFeedMessage::Reload { data, change },
        },
        Err(e) => {
            tracing::warn!(conn_id, error = %e, "Failed to reload admin view");
            AdminFeedMessage::Error {
                error: "Failed to reload complaints".into(),
            }
        }
    };

    match serde_json::to_string(&message) {
        Ok(text) => {
            if !manager.send_to(conn_id, Message::Text(text.into())).await {
                tracing::debug!(conn_id, "Admin view not delivered, connection gone");
            }
        }
        Err(e) => tracing::error!(conn_id, error = %e, "Failed to encode admin view"),
    }
}
