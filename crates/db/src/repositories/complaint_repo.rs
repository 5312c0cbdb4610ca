//! Repository for the `complaints` table.

use complaints_core::complaint::ComplaintStatus;
use complaints_core::ticket;
use complaints_core::types::DbId;
use sqlx::PgPool;

use crate::models::complaint::{Complaint, ComplaintWithSubmitter, CreateComplaint};

/// Column list for `complaints` queries.
const COLUMNS: &str = "\
    id, ticket, user_id, reason, details, image_urls, video_urls, \
    status, created_at, updated_at";

/// Same columns qualified with the `c` alias used by joined queries.
const JOINED_COLUMNS: &str = "\
    c.id, c.ticket, c.user_id, c.reason, c.details, c.image_urls, c.video_urls, \
    c.status, c.created_at, c.updated_at, \
    p.name AS submitter_name, p.role AS submitter_role, \
    p.id_card_number AS submitter_id_card_number";

/// How many candidate tickets to draw before giving up.
pub const MAX_TICKET_ATTEMPTS: usize = 8;

/// Provides CRUD operations for complaints.
pub struct ComplaintRepo;

impl ComplaintRepo {
    /// Insert a complaint, returning the full row (status defaults to `pending`).
    pub async fn create(pool: &PgPool, input: &CreateComplaint) -> Result<Complaint, sqlx::Error> {
        let query = format!(
            "INSERT INTO complaints \
                (user_id, ticket, reason, details, image_urls, video_urls) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(input.user_id)
            .bind(&input.ticket)
            .bind(&input.reason)
            .bind(&input.details)
            .bind(&input.image_urls)
            .bind(&input.video_urls)
            .fetch_one(pool)
            .await
    }

    /// Find a complaint by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE id = $1");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a complaint by its ticket. `ticket` must already be normalized.
    pub async fn find_by_ticket(
        pool: &PgPool,
        ticket: &str,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE ticket = $1");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(ticket)
            .fetch_optional(pool)
            .await
    }

    /// Whether any complaint already carries `ticket`.
    pub async fn ticket_exists(pool: &PgPool, ticket: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM complaints WHERE ticket = $1)")
                .bind(ticket)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Draw an unused ticket code.
    ///
    /// Returns `Ok(None)` when [`MAX_TICKET_ATTEMPTS`] candidates were all
    /// taken. The `uq_complaints_ticket` constraint still guards the insert
    /// against a concurrent submission picking the same code.
    pub async fn generate_ticket(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
        for attempt in 1..=MAX_TICKET_ATTEMPTS {
            let candidate = ticket::generate_ticket();
            if !Self::ticket_exists(pool, &candidate).await? {
                return Ok(Some(candidate));
            }
            tracing::debug!(attempt, ticket = %candidate, "Ticket collision, drawing again");
        }
        Ok(None)
    }

    /// List every complaint joined with its submitter's profile, newest first.
    pub async fn list_with_submitters(
        pool: &PgPool,
    ) -> Result<Vec<ComplaintWithSubmitter>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} \
             FROM complaints c \
             JOIN profiles p ON p.id = c.user_id \
             ORDER BY c.created_at DESC, c.id DESC"
        );
        sqlx::query_as::<_, ComplaintWithSubmitter>(&query)
            .fetch_all(pool)
            .await
    }

    /// Set the status of a complaint. Returns the updated row if found.
    ///
    /// Any status may follow any other.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("UPDATE complaints SET status = $1 WHERE id = $2 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(status.as_str())
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
