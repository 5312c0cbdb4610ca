use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

use crate::{join_url, validate_object_path, ObjectStore, StorageError};

/// Connection settings for [`S3ObjectStore`].
#[derive(Debug, Clone)]
pub struct S3Settings {
    /// Physical S3 bucket. Logical buckets become key prefixes inside it.
    pub bucket: String,
    /// Region override; falls back to the AWS default provider chain.
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
    pub endpoint_url: Option<String>,
    /// Base URL objects are publicly readable at, without the trailing key.
    pub public_base_url: String,
}

/// Stores objects in a single S3 bucket under `{logical bucket}/{path}`.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build a client from the AWS default credential chain plus `settings`.
    pub async fn connect(settings: S3Settings) -> Result<Self, StorageError> {
        if settings.bucket.trim().is_empty() {
            return Err(StorageError::Config("S3 bucket name is empty".into()));
        }

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = settings.region.clone() {
            loader = loader.region(aws_config::Region::new(region));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &settings.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(bucket = %settings.bucket, "S3 object store configured");
        Ok(Self::with_client(
            S3Client::from_conf(builder.build()),
            settings.bucket,
            settings.public_base_url,
        ))
    }

    pub fn with_client(client: S3Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

/// Key of a logical `bucket`/`path` pair inside the physical bucket.
pub fn object_key(bucket: &str, path: &str) -> String {
    format!("{bucket}/{path}")
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        validate_object_path(bucket)?;
        validate_object_path(path)?;

        let key = object_key(bucket, path);
        let size = bytes.len();
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes));
        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request.send().await.map_err(|e| {
            tracing::error!(key = %key, error = %e, "S3 upload failed");
            StorageError::Upload {
                key: key.clone(),
                message: e.to_string(),
            }
        })?;

        tracing::debug!(key = %key, size, "Stored object in S3");
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        join_url(&self.public_base_url, bucket, path)
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
