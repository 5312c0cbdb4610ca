//! Complaint entity model and DTOs.

use complaints_core::complaint::ComplaintStatus;
use complaints_core::roles::Role;
use complaints_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `complaints` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Complaint {
    pub id: DbId,
    pub ticket: String,
    pub user_id: DbId,
    pub reason: String,
    pub details: String,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: ComplaintStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a complaint. Status is left to the column default.
#[derive(Debug)]
pub struct CreateComplaint {
    pub user_id: DbId,
    pub ticket: String,
    pub reason: String,
    pub details: String,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
}

/// Request body for an admin status change.
///
/// Kept as a string so an unknown value is reported as a validation error
/// rather than a body-deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct UpdateComplaintStatus {
    pub status: String,
}

/// The submitter columns joined onto a complaint for the admin view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmitterProfile {
    #[sqlx(rename = "submitter_name")]
    pub name: String,
    #[sqlx(rename = "submitter_role", try_from = "String")]
    pub role: Role,
    #[sqlx(rename = "submitter_id_card_number")]
    pub id_card_number: String,
}

/// A complaint together with the profile of whoever submitted it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ComplaintWithSubmitter {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub complaint: Complaint,
    #[sqlx(flatten)]
    pub submitter: SubmitterProfile,
}
