use std::path::PathBuf;

/// Errors raised by object storage backends.
///
/// Messages are safe to show to the submitter: they name the object, never
/// credentials or internal endpoints.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid object path '{0}'")]
    InvalidPath(String),

    #[error("Failed to store the attachment: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },

    #[error("Storage configuration error: {0}")]
    Config(String),
}
