//! Administrative review: the grouped complaint view and status changes.
//!
//! Every endpoint requires the `ReviewComplaints` capability, checked by the
//! [`RequireAdmin`] extractor before any complaint data is read.

use axum::extract::{Path, State};
use axum::Json;
use complaints_core::complaint::ComplaintStatus;
use complaints_core::error::CoreError;
use complaints_core::roles::Role;
use complaints_core::types::DbId;
use complaints_db::models::complaint::{
    Complaint, ComplaintWithSubmitter, UpdateComplaintStatus,
};
use complaints_db::repositories::ComplaintRepo;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Complaints from one kind of submitter, newest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplaintGroup {
    pub count: usize,
    pub complaints: Vec<ComplaintWithSubmitter>,
}

impl ComplaintGroup {
    fn push(&mut self, row: ComplaintWithSubmitter) {
        self.complaints.push(row);
        self.count += 1;
    }
}

/// Everything the admin page renders.
///
/// Complaints submitted by admins belong to neither group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminView {
    pub students: ComplaintGroup,
    pub staff: ComplaintGroup,
}

impl AdminView {
    /// Partition joined rows by submitter role, preserving their order.
    pub fn from_rows(rows: Vec<ComplaintWithSubmitter>) -> Self {
        let mut view = AdminView::default();
        for row in rows {
            match row.submitter.role {
                Role::Student => view.students.push(row),
                Role::Staff => view.staff.push(row),
                Role::Admin => {}
            }
        }
        view
    }
}

/// Load and partition every complaint.
pub async fn load_admin_view(pool: &PgPool) -> AppResult<AdminView> {
    let rows = ComplaintRepo::list_with_submitters(pool).await?;
    Ok(AdminView::from_rows(rows))
}

/// Response body for a status change.
#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub complaint: Complaint,
    pub view: AdminView,
}

// ---------------------------------------------------------------------------
// GET /admin/complaints
// ---------------------------------------------------------------------------

/// The grouped complaint view.
pub async fn list_complaints(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AdminView>>> {
    let view = load_admin_view(&state.pool).await?;
    tracing::debug!(
        admin_id = admin.user_id,
        students = view.students.count,
        staff = view.staff.count,
        "Admin view loaded",
    );
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// PUT /admin/complaints/{id}/status
// ---------------------------------------------------------------------------

/// Set a complaint's status to any of the four values, then reload the view.
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateComplaintStatus>,
) -> AppResult<Json<DataResponse<StatusUpdateResponse>>> {
    let status: ComplaintStatus = input.status.parse()?;

    let complaint = ComplaintRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Complaint",
            id,
        }))?;

    tracing::info!(
        complaint_id = id,
        ticket = %complaint.ticket,
        status = status.as_str(),
        admin_id = admin.user_id,
        "Complaint status updated",
    );

    let view = load_admin_view(&state.pool).await?;
    Ok(Json(DataResponse {
        data: StatusUpdateResponse { complaint, view },
    }))
}
