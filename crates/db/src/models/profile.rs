//! Profile model: the stored identity behind an authenticated account.

use complaints_core::roles::Role;
use complaints_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `profiles` table. `id` equals the owning account id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub id_card_number: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a profile alongside its account.
#[derive(Debug)]
pub struct CreateProfile {
    pub id: DbId,
    pub name: String,
    pub role: Role,
    pub id_card_number: String,
}
