//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use complaints_core::error::CoreError;
use complaints_core::roles::Role;
use complaints_core::types::DbId;
use complaints_db::models::profile::Profile;
use complaints_db::repositories::{ProfileRepo, UserRepo};

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The signed-in caller: a valid access token plus the profile behind it.
///
/// The profile is read from the database on every request, so role changes
/// apply immediately rather than when the token expires.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Account id (`claims.sub`), equal to `profile.id`.
    pub user_id: DbId,
    pub profile: Profile,
}

impl AuthUser {
    pub fn role(&self) -> Role {
        self.profile.role
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        authenticate(state, token).await
    }
}

/// Resolve an access token to an active account and its profile.
///
/// Shared by the header extractor and the WebSocket upgrade, which carries
/// the token in its query string.
pub async fn authenticate(state: &AppState, token: &str) -> AppResult<AuthUser> {
    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    let active = UserRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .is_some_and(|user| user.is_active);
    if !active {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Account is no longer active".into(),
        )));
    }

    let profile = ProfileRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "No profile exists for this account".into(),
            ))
        })?;

    Ok(AuthUser {
        user_id: claims.sub,
        profile,
    })
}
