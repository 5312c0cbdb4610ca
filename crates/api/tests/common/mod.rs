//! Shared fixtures for the API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use complaints_api::auth::jwt::{generate_access_token, JwtConfig};
use complaints_api::auth::password::hash_password;
use complaints_api::config::{ServerConfig, StorageConfig};
use complaints_api::router::build_app_router;
use complaints_api::state::AppState;
use complaints_api::ws::WsManager;
use complaints_core::roles::Role;
use complaints_core::types::DbId;
use complaints_db::models::profile::CreateProfile;
use complaints_db::models::user::CreateUser;
use complaints_db::repositories::{ProfileRepo, UserRepo};
use complaints_events::ChangeFeed;
use complaints_storage::LocalObjectStore;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

/// Password given to every account created by [`create_account`].
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Public prefix of locally stored attachments.
pub const FILES_BASE_URL: &str = "http://localhost:3000/files";

/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "complaints-test-boundary";

/// Build a test `ServerConfig` with safe defaults, storing attachments
/// under `storage_root`.
pub fn test_config(storage_root: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        max_upload_bytes: 1024 * 1024,
        storage: StorageConfig::Local {
            root: storage_root.to_path_buf(),
            public_base_url: FILES_BASE_URL.to_string(),
        },
        jwt: test_jwt_config(),
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 7,
    }
}

/// A fully wired application plus the handles tests need to inspect it.
///
/// The temporary storage directory lives as long as this value.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub storage: TempDir,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router with all middleware layers.
///
/// Uses `build_app_router` from the library so tests exercise the same
/// middleware stack and `/files` mount that production uses. No database
/// listener is attached; tests that need change events start one.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let storage = TempDir::new().expect("temp storage dir");
    let config = test_config(storage.path());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::new(WsManager::new()),
        change_feed: Arc::new(ChangeFeed::default()),
        object_store: Arc::new(LocalObjectStore::new(storage.path(), FILES_BASE_URL)),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        storage,
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Insert an account with a profile directly, bypassing registration so
/// admins can be created too.
pub async fn create_account(pool: &PgPool, email: &str, name: &str, role: Role) -> DbId {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        },
    )
    .await
    .expect("user creation should succeed");

    ProfileRepo::create(
        pool,
        &CreateProfile {
            id: user.id,
            name: name.to_string(),
            role,
            id_card_number: format!("CARD-{}", user.id),
        },
    )
    .await
    .expect("profile creation should succeed");

    user.id
}

/// Mint an access token without going through login.
pub fn access_token(user_id: DbId, role: Role) -> String {
    generate_access_token(user_id, role, &test_jwt_config()).expect("token generation")
}

/// Create an account and return its id together with a valid access token.
pub async fn signed_in(pool: &PgPool, email: &str, role: Role) -> (DbId, String) {
    let id = create_account(pool, email, email, role).await;
    (id, access_token(id, role))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None, Body::empty()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None, Body::empty()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        Method::POST,
        uri,
        None,
        Some("application/json"),
        Body::from(body.to_string()),
    )
    .await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(
        app,
        Method::POST,
        uri,
        Some(token),
        Some("application/json"),
        Body::from(body.to_string()),
    )
    .await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(
        app,
        Method::PUT,
        uri,
        Some(token),
        Some("application/json"),
        Body::from(body.to_string()),
    )
    .await
}

/// POST a multipart form built from `parts`, optionally authenticated.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    parts: &[FormPart<'_>],
    token: Option<&str>,
) -> Response<Body> {
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    send(
        app,
        Method::POST,
        uri,
        token,
        Some(&content_type),
        Body::from(multipart_body(parts)),
    )
    .await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: Body,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    let request = builder.body(body).expect("valid request");
    app.oneshot(request).await.expect("router is infallible")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

/// One part of a complaint submission form.
pub enum FormPart<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// `reason` and `details` text parts.
pub fn complaint_fields<'a>(reason: &'a str, details: &'a str) -> Vec<FormPart<'a>> {
    vec![
        FormPart::Text {
            name: "reason",
            value: reason,
        },
        FormPart::Text {
            name: "details",
            value: details,
        },
    ]
}

/// Encode `parts` as a `multipart/form-data` body delimited by [`BOUNDARY`].
pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
