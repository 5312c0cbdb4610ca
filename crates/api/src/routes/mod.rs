pub mod admin;
pub mod auth;
pub mod complaints;
pub mod health;
pub mod track;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
/// /auth/refresh                          refresh (public)
/// /auth/logout                           logout (requires auth)
/// /auth/session                          current profile (requires auth)
///
/// /complaints                            submit, multipart (requires auth)
///
/// /track/{ticket}                        read-only status (public)
///
/// /admin/complaints                      grouped view (admin only)
/// /admin/complaints/{id}/status          set status (admin only)
/// /admin/ws                              live view WebSocket (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/complaints", complaints::router())
        .nest("/track", track::router())
        .nest("/admin", admin::router())
}

/// The navigation hub at `/` (outside `/api/v1`).
pub fn landing_router() -> Router<AppState> {
    Router::new().route("/", get(handlers::landing::landing))
}
