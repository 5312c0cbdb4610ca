//! Public ticket tracking.

use axum::extract::{Path, State};
use axum::Json;
use complaints_core::complaint::ComplaintStatus;
use complaints_core::error::CoreError;
use complaints_core::ticket;
use complaints_core::types::Timestamp;
use complaints_db::models::complaint::Complaint;
use complaints_db::repositories::ComplaintRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Read-only view of a complaint for whoever holds its ticket.
///
/// The submitter is deliberately absent.
#[derive(Debug, Serialize)]
pub struct TrackedComplaint {
    pub ticket: String,
    pub reason: String,
    pub details: String,
    pub status: ComplaintStatus,
    pub status_label: &'static str,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
    pub created_at: Timestamp,
}

impl From<Complaint> for TrackedComplaint {
    fn from(c: Complaint) -> Self {
        Self {
            ticket: c.ticket,
            reason: c.reason,
            details: c.details,
            status: c.status,
            status_label: c.status.label(),
            image_urls: c.image_urls,
            video_urls: c.video_urls,
            created_at: c.created_at,
        }
    }
}

/// GET /api/v1/track/{ticket}
///
/// No authentication. The ticket is matched case-insensitively.
pub async fn track_complaint(
    State(state): State<AppState>,
    Path(raw_ticket): Path<String>,
) -> AppResult<Json<DataResponse<TrackedComplaint>>> {
    let ticket = ticket::normalize_ticket(&raw_ticket);
    if ticket.is_empty() {
        return Err(CoreError::TicketNotFound(ticket).into());
    }

    let complaint = ComplaintRepo::find_by_ticket(&state.pool, &ticket)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::TicketNotFound(ticket.clone())))?;

    tracing::debug!(ticket = %ticket, status = %complaint.status.as_str(), "Ticket tracked");

    Ok(Json(DataResponse {
        data: complaint.into(),
    }))
}
