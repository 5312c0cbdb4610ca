//! Account model and DTOs.

use complaints_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full account row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses.
/// The public face of an account is its [`Profile`](super::profile::Profile).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new account.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
}
