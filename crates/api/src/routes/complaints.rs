//! Route definitions for the `/complaints` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::complaints;
use crate::state::AppState;

/// Routes mounted at `/complaints`.
///
/// ```text
/// POST / -> submit_complaint (multipart, requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(complaints::submit_complaint))
}
