//! HTTP-level integration tests for the auth endpoints.
//!
//! Tests cover signup, login, token refresh and rotation, logout, the
//! session context returned by `/auth/me`, and invitation claiming.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth, signup, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn login(app: axum::Router, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

/// Signup returns 201 with tokens and the new user; the email is normalized.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_success(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({
        "email": "  Director@Example.com ",
        "password": TEST_PASSWORD,
        "display_name": "Ada",
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["email"], "director@example.com");
    assert_eq!(json["user"]["display_name"], "Ada");
    assert!(
        json["user"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );
}

/// A duplicate email is rejected with 409.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_duplicate_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    signup(&app, "taken@example.com").await;

    let body = json!({ "email": "TAKEN@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Invalid emails and short passwords are validation errors.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_validation(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/signup",
        json!({ "email": "not-an-email", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        "/api/v1/auth/signup",
        json!({ "email": "short@example.com", "password": "abc" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Login / refresh / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, user_id) = signup(&app, "login@example.com").await;

    let response = login(app, "login@example.com", TEST_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["user"]["id"], user_id);
}

/// Wrong password and unknown email both return the same 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_rejects_bad_credentials(pool: PgPool) {
    let app = common::build_test_app(pool);
    signup(&app, "wrongpw@example.com").await;

    let response = login(app.clone(), "wrongpw@example.com", "incorrect").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(response).await;

    let response = login(app, "ghost@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let unknown_user = body_json(response).await;

    assert_eq!(wrong_password["error"], unknown_user["error"]);
}

/// A refresh token rotates on use and cannot be replayed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_refresh_rotates(pool: PgPool) {
    let app = common::build_test_app(pool);
    signup(&app, "refresher@example.com").await;
    let login_json = body_json(login(app.clone(), "refresher@example.com", TEST_PASSWORD).await).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["refresh_token"].as_str().unwrap(), refresh_token);

    let replay = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes every session of the user.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    let app = common::build_test_app(pool);
    signup(&app, "logout@example.com").await;
    let login_json = body_json(login(app.clone(), "logout@example.com", TEST_PASSWORD).await).await;
    let access_token = login_json["access_token"].as_str().unwrap();
    let refresh_token = login_json["refresh_token"].as_str().unwrap();

    let response = post_json_auth(app.clone(), "/api/v1/auth/logout", json!({}), access_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_bearer_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Session context
// ---------------------------------------------------------------------------

/// `/auth/me` lists owned projects with their access and continue route.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_lists_projects(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, user_id) = signup(&app, "me@example.com").await;
    let project_id = common::create_project(&app, &token, "Lighthouse").await;

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["id"], user_id);
    let projects = json["data"]["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], project_id);
    assert_eq!(projects[0]["access"], "owner");
    assert_eq!(projects[0]["continue_route"], format!("/planning/{project_id}"));
}

/// An invitation sent before the invitee had an account is claimed at signup.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_claims_pending_invitation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = signup(&app, "owner@example.com").await;
    let project_id = common::create_project(&app, &owner_token, "Shared").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/collaborators"),
        json!({ "email": "later@example.com", "role": "editor" }),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["joined"], false);

    let (invitee_token, _) = signup(&app, "later@example.com").await;
    let json = body_json(get_auth(app, "/api/v1/auth/me", &invitee_token).await).await;
    let projects = json["data"]["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["access"], "editor");
    assert_eq!(projects[0]["permissions"]["edit"], true);
    assert_eq!(projects[0]["permissions"]["admin"], false);
}
