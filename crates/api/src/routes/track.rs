//! Route definitions for the `/track` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::track;
use crate::state::AppState;

/// Routes mounted at `/track`.
///
/// ```text
/// GET /{ticket} -> track_complaint (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{ticket}", get(track::track_complaint))
}
