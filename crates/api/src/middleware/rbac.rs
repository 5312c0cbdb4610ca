//! Capability-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and consults
//! [`authorize`](complaints_core::roles::authorize) for one capability, so
//! every protected flow makes the same check the same way.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use complaints_core::roles::{authorize, Capability};

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Notice shown to a signed-in user who opens the admin view.
pub const ADMIN_REQUIRED_NOTICE: &str = "You do not have admin privileges";

/// Notice shown to a profile that may not submit complaints.
pub const SUBMIT_DENIED_NOTICE: &str = "Your account cannot submit complaints";

/// Reject `user` with 403 unless their role holds `capability`.
pub fn require_capability(user: &AuthUser, capability: Capability) -> AppResult<()> {
    let notice = match capability {
        Capability::ReviewComplaints => ADMIN_REQUIRED_NOTICE,
        Capability::SubmitComplaint => SUBMIT_DENIED_NOTICE,
    };
    let decision = authorize(user.role(), capability);
    if !decision.is_granted() {
        tracing::info!(
            user_id = user.user_id,
            role = %user.role(),
            ?capability,
            "Access denied"
        );
    }
    decision.require(notice).map_err(AppError::Core)
}

/// Requires the `ReviewComplaints` capability (admins).
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_capability(&user, Capability::ReviewComplaints)?;
        Ok(RequireAdmin(user))
    }
}

/// Requires the `SubmitComplaint` capability (every role today).
pub struct RequireSubmitter(pub AuthUser);

impl FromRequestParts<AppState> for RequireSubmitter {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_capability(&user, Capability::SubmitComplaint)?;
        Ok(RequireSubmitter(user))
    }
}
