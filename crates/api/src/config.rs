use std::path::PathBuf;

use complaints_core::attachment::DEFAULT_MAX_UPLOAD_BYTES;
use complaints_storage::S3Settings;

use crate::auth::jwt::JwtConfig;

/// Where uploaded attachments are kept.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Files on local disk, served back by this server under `/files`.
    Local {
        root: PathBuf,
        public_base_url: String,
    },
    /// An S3 or S3-compatible bucket.
    S3(S3Settings),
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Per-attachment size limit in bytes (default: 50 MiB).
    pub max_upload_bytes: usize,
    /// Attachment storage backend.
    pub storage: StorageConfig,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                              |
    /// |---------------------------|--------------------------------------|
    /// | `HOST`                    | `0.0.0.0`                            |
    /// | `PORT`                    | `3000`                               |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`              |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                                 |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                                 |
    /// | `MAX_UPLOAD_BYTES`        | `52428800`                           |
    /// | `STORAGE_BACKEND`         | `local` (`local` or `s3`)            |
    /// | `STORAGE_ROOT`            | `./storage`                          |
    /// | `STORAGE_PUBLIC_BASE_URL` | `http://localhost:{PORT}/files`      |
    /// | `S3_BUCKET`               | required when `STORAGE_BACKEND=s3`   |
    /// | `S3_REGION`               | AWS default chain                    |
    /// | `S3_ENDPOINT_URL`         | AWS default endpoint                 |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");
        assert!(max_upload_bytes > 0, "MAX_UPLOAD_BYTES must be positive");

        let public_base_url = std::env::var("STORAGE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}/files"));

        let storage = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .as_str()
        {
            "local" => StorageConfig::Local {
                root: std::env::var("STORAGE_ROOT")
                    .unwrap_or_else(|_| "./storage".into())
                    .into(),
                public_base_url,
            },
            "s3" => StorageConfig::S3(S3Settings {
                bucket: std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when STORAGE_BACKEND=s3"),
                region: std::env::var("S3_REGION").ok(),
                endpoint_url: std::env::var("S3_ENDPOINT_URL").ok(),
                public_base_url,
            }),
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_upload_bytes,
            storage,
            jwt,
        }
    }

    /// Body limit for one request: room for [`MAX_FILES_PER_REQUEST`]
    /// maximum-size files.
    pub fn request_body_limit(&self) -> usize {
        self.max_upload_bytes.saturating_mul(MAX_FILES_PER_REQUEST)
    }
}

/// Attachments one submission may carry at full size.
pub const MAX_FILES_PER_REQUEST: usize = 10;
