//! Handler for complaint submission.
//!
//! A submission is a multipart form: `reason`, `details` and any number of
//! `images` / `videos` file parts. The flow is strictly sequential:
//! validate everything, upload images then videos, draw a ticket, insert.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use complaints_core::attachment::{self, MediaKind, COMPLAINT_BUCKET};
use complaints_core::complaint;
use complaints_core::error::CoreError;
use complaints_core::types::DbId;
use complaints_db::models::complaint::{Complaint, CreateComplaint};
use complaints_db::repositories::ComplaintRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSubmitter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitComplaintResponse {
    pub ticket: String,
    pub message: String,
    pub complaint: Complaint,
}

/// One file part of the submission form.
#[derive(Debug)]
struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// The decoded submission form, before validation.
#[derive(Debug, Default)]
struct SubmissionForm {
    reason: String,
    details: String,
    images: Vec<UploadedFile>,
    videos: Vec<UploadedFile>,
}

// ---------------------------------------------------------------------------
// POST /complaints
// ---------------------------------------------------------------------------

/// Submit a complaint with optional image and video attachments.
///
/// Returns 201 with the ticket code. Nothing is retried; the first failing
/// step is reported and no complaint row exists afterwards. Objects already
/// uploaded by a failed submission stay in storage.
pub async fn submit_complaint(
    State(state): State<AppState>,
    RequireSubmitter(user): RequireSubmitter,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<SubmitComplaintResponse>>)> {
    let form = read_form(&mut multipart).await?;

    let reason = complaint::validate_reason(&form.reason)?.to_string();
    let details = complaint::validate_details(&form.details)?.to_string();
    validate_files(MediaKind::Image, &form.images, state.config.max_upload_bytes)?;
    validate_files(MediaKind::Video, &form.videos, state.config.max_upload_bytes)?;

    let image_urls = upload_files(&state, user.user_id, MediaKind::Image, form.images).await?;
    let video_urls = upload_files(&state, user.user_id, MediaKind::Video, form.videos).await?;

    let ticket = ComplaintRepo::generate_ticket(&state.pool)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Could not allocate a unique ticket number, please try again".into(),
            ))
        })?;

    let complaint = ComplaintRepo::create(
        &state.pool,
        &CreateComplaint {
            user_id: user.user_id,
            ticket: ticket.clone(),
            reason,
            details,
            image_urls,
            video_urls,
        },
    )
    .await?;

    tracing::info!(
        complaint_id = complaint.id,
        ticket = %ticket,
        user_id = user.user_id,
        images = complaint.image_urls.len(),
        videos = complaint.video_urls.len(),
        "Complaint submitted",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmitComplaintResponse {
                message: format!(
                    "Complaint submitted successfully. Your ticket number is {ticket}"
                ),
                ticket,
                complaint,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Drain the multipart stream into a [`SubmissionForm`].
///
/// File parts keep their arrival order. Unknown fields are ignored.
async fn read_form(multipart: &mut Multipart) -> AppResult<SubmissionForm> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "reason" | "details" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if name == "reason" {
                    form.reason = text;
                } else {
                    form.details = text;
                }
            }
            "images" | "images[]" | "videos" | "videos[]" => {
                let file_name = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // A file input left empty still posts a nameless, empty part.
                if file_name.is_none() && bytes.is_empty() {
                    continue;
                }
                let file = UploadedFile {
                    file_name: file_name.unwrap_or_else(|| "upload".to_string()),
                    content_type,
                    bytes: bytes.to_vec(),
                };
                if name.starts_with("images") {
                    form.images.push(file);
                } else {
                    form.videos.push(file);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn validate_files(kind: MediaKind, files: &[UploadedFile], max_bytes: usize) -> AppResult<()> {
    for file in files {
        attachment::validate_attachment(
            kind,
            &file.file_name,
            file.content_type.as_deref(),
            file.bytes.len(),
            max_bytes,
        )?;
    }
    Ok(())
}

/// Upload `files` one at a time and return their public URLs in input order.
async fn upload_files(
    state: &AppState,
    user_id: DbId,
    kind: MediaKind,
    files: Vec<UploadedFile>,
) -> AppResult<Vec<String>> {
    let mut urls = Vec::with_capacity(files.len());
    for file in files {
        let path = attachment::object_path(user_id, Utc::now().timestamp_millis(), &file.file_name);
        let size = file.bytes.len();
        state
            .object_store
            .upload(
                COMPLAINT_BUCKET,
                &path,
                file.bytes,
                file.content_type.as_deref(),
            )
            .await?;
        tracing::debug!(
            user_id,
            kind = kind.as_str(),
            path = %path,
            size,
            backend = state.object_store.backend_name(),
            "Attachment uploaded",
        );
        urls.push(state.object_store.public_url(COMPLAINT_BUCKET, &path));
    }
    Ok(urls)
}
