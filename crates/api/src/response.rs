//! The `{ "data": ... }` envelope every successful API response uses.
//!
//! Errors use a different shape (`{ "error", "code", "redirect"? }`), see
//! [`AppError`](crate::error::AppError).

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: view }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
