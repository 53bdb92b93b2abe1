//! HTTP-level integration tests for project chat, read status,
//! collaborators and change publishing.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, create_project, delete_auth, get_auth, post_json_auth, put_json_auth, signup,
};
use filmcraft_api::ws::WsManager;
use filmcraft_events::{ChangeTable, EventBus};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn post_message(app: &Router, token: &str, project_id: i64, body: Value) -> Value {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/messages"),
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn invite(app: &Router, token: &str, project_id: i64, body: Value) -> axum::response::Response {
    post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/collaborators"),
        body,
        token,
    )
    .await
}

/// Owner plus an editor collaborator on one project.
async fn team(app: &Router) -> (String, String, i64) {
    let (owner, _) = signup(app, "owner@example.com").await;
    let (editor, _) = signup(app, "editor@example.com").await;
    let id = create_project(app, &owner, "Lighthouse").await;
    let response = invite(app, &owner, id, json!({ "email": "editor@example.com", "role": "editor" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    (owner, editor, id)
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_post_and_list_messages(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, editor, id) = team(&app).await;

    let first = post_message(&app, &owner, id, json!({ "content": "Call time is 6am" })).await;
    assert_eq!(first["message_type"], "general");
    assert_eq!(first["author_label"], "You");
    assert_eq!(first["is_own"], true);
    assert_eq!(first["metadata"]["author_email"], "owner@example.com");

    post_message(
        &app,
        &editor,
        id,
        json!({ "content": "Which lens for the storm?", "message_type": "question" }),
    )
    .await;

    let json = body_json(get_auth(app.clone(), &format!("/api/v1/projects/{id}/messages"), &editor).await).await;
    let messages = json["data"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["author_label"], "owner@example.com");
    assert_eq!(messages[0]["is_own"], false);
    assert_eq!(messages[1]["author_label"], "You");

    let json = body_json(
        get_auth(app.clone(), &format!("/api/v1/projects/{id}/messages?type=question"), &owner).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = body_json(
        get_auth(app.clone(), &format!("/api/v1/projects/{id}/messages?type=all&q=CALL"), &owner).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["content"], "Call time is 6am");

    let response = get_auth(app, &format!("/api/v1/projects/{id}/messages?type=gossip"), &owner).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_message_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &owner, "Lighthouse").await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{id}/messages"),
        json!({ "content": "   " }),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_messages(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &owner, "Lighthouse").await;
    post_message(&app, &owner, id, json!({ "content": "Book the crane" })).await;
    post_message(&app, &owner, id, json!({ "content": "Crane confirmed" })).await;
    post_message(&app, &owner, id, json!({ "content": "Lunch at noon" })).await;

    let json = body_json(
        get_auth(app.clone(), &format!("/api/v1/projects/{id}/messages/search?q=crane"), &owner).await,
    )
    .await;
    let results = json["data"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["content"], "Crane confirmed", "newest first");

    let json = body_json(
        get_auth(app, &format!("/api/v1/projects/{id}/messages/search?q=%20"), &owner).await,
    )
    .await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

/// Only the author may edit or delete a message.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_and_delete_own_messages(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, editor, id) = team(&app).await;
    let message_id = post_message(&app, &owner, id, json!({ "content": "Wrap at 8" })).await["id"]
        .as_i64()
        .unwrap();
    let uri = format!("/api/v1/messages/{message_id}");

    let response = put_json_auth(app.clone(), &uri, json!({ "content": "Wrap at 9" }), &editor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = delete_auth(app.clone(), &uri, &editor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(app.clone(), &uri, json!({ "content": "Wrap at 9" }), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["content"], "Wrap at 9");
    assert_eq!(json["data"]["metadata"]["edited"], true);
    assert!(json["data"]["metadata"]["edited_at"].is_string());

    let response = delete_auth(app.clone(), &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app, &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Read status
// ---------------------------------------------------------------------------

/// Unread counts skip the reader's own messages and reset on mark-read.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_read_status(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, editor, id) = team(&app).await;
    let read_uri = format!("/api/v1/projects/{id}/messages/read");

    let first = post_message(&app, &owner, id, json!({ "content": "One" })).await;
    post_message(&app, &owner, id, json!({ "content": "Two" })).await;
    post_message(&app, &editor, id, json!({ "content": "Mine" })).await;

    let json = body_json(get_auth(app.clone(), &read_uri, &editor).await).await;
    assert_eq!(json["data"]["unread_count"], 2);
    assert_eq!(json["data"]["badge"], "2");
    assert!(json["data"]["last_read_message_id"].is_null());

    let response = put_json_auth(
        app.clone(),
        &read_uri,
        json!({ "last_read_message_id": first["id"] }),
        &editor,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["unread_count"], 1);

    let json = body_json(put_json_auth(app.clone(), &read_uri, json!({}), &editor).await).await;
    assert_eq!(json["data"]["unread_count"], 0);
    assert!(json["data"]["badge"].is_null());

    let response = put_json_auth(app, &read_uri, json!({ "last_read_message_id": 999_999 }), &editor).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invite_defaults_and_listing(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &owner, "Lighthouse").await;

    let response = invite(&app, &owner, id, json!({ "email": "  Pending@Example.com " })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "pending@example.com");
    assert_eq!(json["data"]["role"], "viewer");
    assert_eq!(json["data"]["film_role"], "crew");
    assert_eq!(json["data"]["film_role_label"], "General Crew");
    assert_eq!(json["data"]["joined"], false);

    let response = invite(
        &app,
        &owner,
        id,
        json!({ "email": "pending@example.com", "role": "editor" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = invite(&app, &owner, id, json!({ "email": "owner@example.com" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = invite(
        &app,
        &owner,
        id,
        json!({ "email": "dp@example.com", "film_role": "grip" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(
        get_auth(app, &format!("/api/v1/projects/{id}/collaborators"), &owner).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

/// Only admins manage the team; removal revokes access.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_collaborator(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, editor, id) = team(&app).await;

    let response = invite(&app, &editor, id, json!({ "email": "friend@example.com" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(
        get_auth(app.clone(), &format!("/api/v1/projects/{id}/collaborators"), &editor).await,
    )
    .await;
    let collaborator = &json["data"][0];
    assert_eq!(collaborator["joined"], true);
    let collaborator_id = collaborator["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/collaborators/{collaborator_id}"), &editor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &format!("/api/v1/collaborators/{collaborator_id}"), &owner).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/v1/projects/{id}"), &editor).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A removed collaborator stops receiving the project's invalidations on
/// connections that are already open.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_collaborator_revokes_realtime(pool: PgPool) {
    let ws_manager = Arc::new(WsManager::new());
    let app = common::build_test_app_with_ws(pool, Arc::clone(&ws_manager));
    let (owner, owner_id) = signup(&app, "owner@example.com").await;
    let (_, editor_id) = signup(&app, "editor@example.com").await;
    let id = create_project(&app, &owner, "Lighthouse").await;
    let json = body_json(invite(&app, &owner, id, json!({ "email": "editor@example.com" })).await).await;
    let collaborator_id = json["data"]["id"].as_i64().unwrap();

    let _editor_rx = ws_manager.add("editor-conn".to_string(), Some(editor_id)).await;
    let _owner_rx = ws_manager.add("owner-conn".to_string(), Some(owner_id)).await;
    ws_manager.subscribe("editor-conn", id).await;
    ws_manager.subscribe("owner-conn", id).await;

    let response = delete_auth(app, &format!("/api/v1/collaborators/{collaborator_id}"), &owner).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(ws_manager.subscriber_count(id).await, 1);
    assert!(!ws_manager.unsubscribe("editor-conn", id).await);
}

// ---------------------------------------------------------------------------
// Change publishing
// ---------------------------------------------------------------------------

/// Mutations publish a change event naming the project, table and actor.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mutations_publish_changes(pool: PgPool) {
    let bus = Arc::new(EventBus::default());
    let mut rx = bus.subscribe();
    let app = common::build_test_app_with_bus(pool, Arc::clone(&bus));
    let (owner, user_id) = signup(&app, "owner@example.com").await;

    let id = create_project(&app, &owner, "Lighthouse").await;
    let event = rx.recv().await.unwrap();
    assert_eq!(event.project_id, id);
    assert_eq!(event.table, ChangeTable::Projects);
    assert_eq!(event.actor_user_id, Some(user_id));

    post_message(&app, &owner, id, json!({ "content": "Hello" })).await;
    let event = rx.recv().await.unwrap();
    assert_eq!(event.table, ChangeTable::Comments);

    // Reads publish nothing.
    get_auth(app, &format!("/api/v1/projects/{id}/messages"), &owner).await;
    assert!(rx.try_recv().is_err());
}
