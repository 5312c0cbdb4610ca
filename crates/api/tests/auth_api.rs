//! HTTP-level integration tests for the `/auth` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use complaints_core::roles::Role;
use complaints_db::repositories::UserRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn registration(email: &str, role: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "password": "a-long-enough-password",
        "name": "Ada Student",
        "role": role,
        "id_card_number": "STU-0042",
    })
}

/// Log in through the API and return the `data` object.
async fn login(app: axum::Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registering as a student creates the profile and signs in immediately.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_student(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.router(),
        "/api/v1/auth/register",
        registration("Ada@Example.com", "student"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"]["refresh_token"].is_string());
    assert_eq!(json["data"]["expires_in"], 15 * 60);
    assert_eq!(json["data"]["profile"]["role"], "student");
    assert_eq!(json["data"]["profile"]["id_card_number"], "STU-0042");

    // Email is stored lowercased.
    let user = UserRepo::find_by_email(&app.state.pool, "ada@example.com")
        .await
        .unwrap();
    assert!(user.is_some());
}

/// Admin is never a self-service choice.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_admin_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.router(),
        "/api/v1/auth/register",
        registration("boss@example.com", "admin"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_unknown_role_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.router(),
        "/api/v1/auth/register",
        registration("who@example.com", "janitor"),
    )
    .await;

    assert!(response.status().is_client_error());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);

    let first = post_json(
        app.router(),
        "/api/v1/auth/register",
        registration("twice@example.com", "staff"),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(
        app.router(),
        "/api/v1/auth/register",
        registration("twice@example.com", "student"),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_short_password_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut body = registration("short@example.com", "student");
    body["password"] = "short".into();
    let response = post_json(app.router(), "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let id = common::create_account(&pool, "staff@example.com", "Sam Staff", Role::Staff).await;
    let app = common::build_test_app(pool);

    let data = login(app.router(), "staff@example.com", TEST_PASSWORD).await;

    assert!(data["access_token"].is_string());
    assert_eq!(data["profile"]["id"], id);
    assert_eq!(data["profile"]["role"], "staff");
    assert_eq!(data["profile"]["name"], "Sam Staff");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    common::create_account(&pool, "wrong@example.com", "W", Role::Student).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "wrong@example.com", "password": "nope-nope-nope" });
    let response = post_json(app.router(), "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["redirect"], "/auth");
}

/// Unknown email and wrong password are indistinguishable.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_unknown_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@example.com", "password": TEST_PASSWORD });
    let response = post_json(app.router(), "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_deactivated_account(pool: PgPool) {
    let id = common::create_account(&pool, "gone@example.com", "G", Role::Student).await;
    UserRepo::deactivate(&pool, id).await.unwrap();
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "gone@example.com", "password": TEST_PASSWORD });
    let response = post_json(app.router(), "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Refresh / logout
// ---------------------------------------------------------------------------

/// A refresh token works exactly once.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    common::create_account(&pool, "rot@example.com", "R", Role::Student).await;
    let app = common::build_test_app(pool);

    let data = login(app.router(), "rot@example.com", TEST_PASSWORD).await;
    let refresh_token = data["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let first = post_json(app.router(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_json(first).await;
    assert_ne!(json["data"]["refresh_token"], refresh_token.as_str());

    let reused = post_json(app.router(), "/api/v1/auth/refresh", body).await;
    assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes every outstanding refresh token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    common::create_account(&pool, "out@example.com", "O", Role::Staff).await;
    let app = common::build_test_app(pool);

    let data = login(app.router(), "out@example.com", TEST_PASSWORD).await;
    let access = data["access_token"].as_str().unwrap();
    let refresh_token = data["refresh_token"].as_str().unwrap();

    let response = post_json_auth(
        app.router(),
        "/api/v1/auth/logout",
        serde_json::json!({}),
        access,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.router(), "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_returns_profile(pool: PgPool) {
    let (id, token) = common::signed_in(&pool, "me@example.com", Role::Student).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.router(), "/api/v1/auth/session", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["user_id"], id);
    assert_eq!(json["data"]["profile"]["role"], "student");
}

/// No session means a 401 that points the client at the sign-in page.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_without_token_redirects_to_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.router(), "/api/v1/auth/session").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["redirect"], "/auth");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_with_garbage_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app.router(), "/api/v1/auth/session", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
