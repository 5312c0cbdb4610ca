use std::path::PathBuf;

use async_trait::async_trait;

use crate::{join_url, validate_object_path, ObjectStore, StorageError};

/// Stores objects as files under `root/{bucket}/{path}`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    /// `public_base_url` is where `root` is served, e.g.
    /// `http://localhost:3000/files`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        validate_object_path(bucket)?;
        validate_object_path(path)?;

        let target = self.root.join(bucket).join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let size = bytes.len();
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|source| StorageError::Io {
                path: target.clone(),
                source,
            })?;

        tracing::debug!(bucket, path, size, "Stored object on local disk");
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        join_url(&self.public_base_url, bucket, path)
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
