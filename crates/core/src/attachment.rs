//! Attachment rules: which files are accepted and where they are stored.
//!
//! Every upload lands in [`COMPLAINT_BUCKET`] under
//! `{user_id}/{unix_millis}-{random}.{ext}` so two uploads never collide,
//! even for the same user in the same millisecond.

use rand::Rng;

use crate::error::CoreError;
use crate::types::DbId;

/// Object storage bucket for complaint media.
pub const COMPLAINT_BUCKET: &str = "complaint-files";

/// Length of the random token in object paths.
pub const PATH_TOKEN_LEN: usize = 8;

/// Default per-file size limit (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// The two attachment lists a complaint carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// MIME top-level type this kind accepts.
    pub fn mime_prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Video => "video/",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Validate one uploaded file against its list's rules.
///
/// A missing content type is accepted; browsers do not always send one.
pub fn validate_attachment(
    kind: MediaKind,
    file_name: &str,
    content_type: Option<&str>,
    size: usize,
    max_bytes: usize,
) -> Result<(), CoreError> {
    if size == 0 {
        return Err(CoreError::Validation(format!(
            "Attachment '{file_name}' is empty"
        )));
    }
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "Attachment '{file_name}' exceeds maximum size of {max_bytes} bytes (got {size})"
        )));
    }
    if let Some(ct) = content_type {
        if !ct.starts_with(kind.mime_prefix()) {
            return Err(CoreError::Validation(format!(
                "Attachment '{file_name}' has content type '{ct}', expected {}*",
                kind.mime_prefix()
            )));
        }
    }
    Ok(())
}

/// Lowercased extension of `file_name`, if it has one.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    ext.chars()
        .all(|c| c.is_ascii_alphanumeric())
        .then_some(ext)
}

/// Build the storage path for a new upload.
pub fn object_path(user_id: DbId, uploaded_at_millis: i64, file_name: &str) -> String {
    object_path_with_token(user_id, uploaded_at_millis, &random_token(), file_name)
}

/// [`object_path`] with an explicit random token.
pub fn object_path_with_token(
    user_id: DbId,
    uploaded_at_millis: i64,
    token: &str,
    file_name: &str,
) -> String {
    match file_extension(file_name) {
        Some(ext) => format!("{user_id}/{uploaded_at_millis}-{token}.{ext}"),
        None => format!("{user_id}/{uploaded_at_millis}-{token}"),
    }
}

fn random_token() -> String {
    let mut rng = rand::rng();
    (0..PATH_TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}
