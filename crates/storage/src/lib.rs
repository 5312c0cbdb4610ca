//! Object storage for complaint attachments.
//!
//! [`ObjectStore`] is the seam the API uploads through. Two backends:
//!
//! - [`LocalObjectStore`] writes under a root directory; the API serves the
//!   files back at `/files/{bucket}/{path}`.
//! - [`S3ObjectStore`] puts objects into an S3 (or S3-compatible) bucket.

pub mod error;
pub mod local;
pub mod s3;

use async_trait::async_trait;

pub use error::StorageError;
pub use local::LocalObjectStore;
pub use s3::{S3ObjectStore, S3Settings};

/// Upload target for attachment bytes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path` inside `bucket`, replacing nothing: paths are
    /// expected to be unique per upload.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Publicly reachable URL of an uploaded object.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Reject bucket names or paths that could escape their namespace.
///
/// Accepts relative, `/`-separated segments made of ASCII alphanumerics,
/// `-`, `_` and `.`, where no segment is empty, `.` or `..`.
pub fn validate_object_path(path: &str) -> Result<(), StorageError> {
    let valid = !path.is_empty()
        && path.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        });
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidPath(path.to_string()))
    }
}

/// Join a base URL, bucket and path with single slashes.
pub(crate) fn join_url(base: &str, bucket: &str, path: &str) -> String {
    format!("{}/{bucket}/{path}", base.trim_end_matches('/'))
}
