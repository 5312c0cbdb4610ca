//! Repository for the `profiles` table.

use complaints_core::roles::Role;
use complaints_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::profile::{CreateProfile, Profile};

const COLUMNS: &str = "id, name, role, id_card_number, created_at, updated_at";

/// Read access to profiles, plus creation at registration time.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert the profile for a freshly created account.
    pub async fn create<'e, E>(executor: E, input: &CreateProfile) -> Result<Profile, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO profiles (id, name, role, id_card_number)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(input.id)
            .bind(&input.name)
            .bind(input.role.as_str())
            .bind(&input.id_card_number)
            .fetch_one(executor)
            .await
    }

    /// Find the profile of an account.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Change a profile's role. Used to promote admins out of band.
    pub async fn set_role(
        pool: &PgPool,
        id: DbId,
        role: Role,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("UPDATE profiles SET role = $1 WHERE id = $2 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Profile>(&query)
            .bind(role.as_str())
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
