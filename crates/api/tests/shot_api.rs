//! HTTP-level integration tests for scenes, shots, shot images and shot
//! comments.

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{
    body_bytes, body_json, create_project, delete_auth, get, get_auth, png_bytes, post_auth,
    post_json_auth, put_json_auth, signup, upload_auth, PUBLIC_BASE_URL,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_shot(app: &Router, token: &str, project_id: i64, body: Value) -> Value {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shots"),
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// A project without a story gets a single default scene, and syncing
/// again leaves existing scenes alone.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sync_scenes_without_story(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;
    let sync = format!("/api/v1/projects/{id}/scenes/sync");

    let response = post_auth(app.clone(), &sync, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["title"], "Scene 1");
    assert_eq!(json["data"][0]["scene_number"], 1);

    post_auth(app.clone(), &sync, &token).await;
    let json = body_json(get_auth(app, &format!("/api/v1/projects/{id}/scenes"), &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["checklist_progress"], 0);
    assert_eq!(json["data"][0]["checklist_complete"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sync_scenes_from_story(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;

    put_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{id}/story-structure"),
        json!([
            { "title": "Opening", "description": "The keeper climbs" },
            { "title": "Storm", "location": "Cliff", "location_type": "Outdoor" },
        ]),
        &token,
    )
    .await;

    let json = body_json(
        post_auth(app, &format!("/api/v1/projects/{id}/scenes/sync"), &token).await,
    )
    .await;
    let scenes = json["data"].as_array().unwrap();
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0]["title"], "Opening");
    assert_eq!(scenes[1]["scene_number"], 2);
    assert_eq!(scenes[1]["location"], "Cliff");
    assert_eq!(scenes[1]["location_type"], "Outdoor");
}

/// Toggling items moves checklist progress; set-all completes it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scene_checklist(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;
    let json = body_json(
        post_auth(app.clone(), &format!("/api/v1/projects/{id}/scenes/sync"), &token).await,
    )
    .await;
    let scene_id = json["data"][0]["id"].as_i64().unwrap();
    let toggle = format!("/api/v1/scenes/{scene_id}/checklist/toggle");

    let response = post_json_auth(app.clone(), &toggle, json!({ "key": "lighting_setup" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["checklist"]["lighting_setup"], true);
    assert_eq!(json["data"]["checklist_progress"], 17);

    let response = post_json_auth(app.clone(), &toggle, json!({ "key": "coffee" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/scenes/{scene_id}/checklist"),
        json!({ "checked": true }),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["checklist_progress"], 100);
    assert_eq!(json["data"]["checklist_complete"], true);

    let response = put_json_auth(
        app,
        &format!("/api/v1/scenes/{scene_id}"),
        json!({ "location_type": "Underwater" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Deleting a scene keeps the shots filed under its number.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_scene_keeps_shots(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;
    let json = body_json(
        post_auth(app.clone(), &format!("/api/v1/projects/{id}/scenes/sync"), &token).await,
    )
    .await;
    let scene_id = json["data"][0]["id"].as_i64().unwrap();
    create_shot(&app, &token, id, json!({ "scene_number": 1 })).await;

    let response = delete_auth(app.clone(), &format!("/api/v1/scenes/{scene_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app.clone(), &format!("/api/v1/scenes/{scene_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(get_auth(app.clone(), &format!("/api/v1/projects/{id}/scenes"), &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
    let json = body_json(get_auth(app, &format!("/api/v1/projects/{id}/shots"), &token).await).await;
    assert_eq!(json["data"]["shots"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Shots
// ---------------------------------------------------------------------------

/// A shot created with only a scene number takes the "add shot" defaults.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_shot_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;
    post_auth(app.clone(), &format!("/api/v1/projects/{id}/scenes/sync"), &token).await;

    let first = create_shot(&app, &token, id, json!({ "scene_number": 1 })).await;
    assert_eq!(first["title"], "Scene 1 - Shot 1");
    assert_eq!(first["shot_type"], "Medium Shot");
    assert_eq!(first["camera_movement"], "Static");
    assert_eq!(first["duration"], "30 seconds");
    assert_eq!(first["priority"], "Medium");
    assert_eq!(first["status"], "pending");
    assert_eq!(first["order_index"], 1.0);
    assert_eq!(first["priority_color"], "yellow");

    let second = create_shot(&app, &token, id, json!({ "scene_number": 1 })).await;
    assert_eq!(second["title"], "Scene 1 - Shot 2");
    assert_eq!(second["order_index"], 2.0);

    let orphan = create_shot(&app, &token, id, json!({ "scene_number": 7 })).await;
    assert_eq!(orphan["title"], "Scene - Shot 1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_shot_rejects_bad_priority(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{id}/shots"),
        json!({ "scene_number": 1, "priority": "Urgent" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Duplicates sort right after the source and start over as pending.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_shot(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;
    let shot = create_shot(
        &app,
        &token,
        id,
        json!({ "scene_number": 1, "title": "Wide of tower", "status": "completed" }),
    )
    .await;
    let shot_id = shot["id"].as_i64().unwrap();

    let response = post_auth(app.clone(), &format!("/api/v1/shots/{shot_id}/duplicate"), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let copy = body_json(response).await["data"].clone();
    assert_eq!(copy["title"], "Wide of tower (Copy)");
    assert_eq!(copy["status"], "pending");
    assert_eq!(copy["order_index"], 1.5);

    let json = body_json(get_auth(app, &format!("/api/v1/projects/{id}/shots"), &token).await).await;
    let shots = json["data"]["shots"].as_array().unwrap();
    assert_eq!(shots.len(), 2);
    assert_eq!(shots[1]["title"], "Wide of tower (Copy)");
    assert_eq!(json["data"]["progress"], 50);
}

/// complete, retake and toggle move the status; progress follows.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shot_status_changes(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;
    let shot_id = create_shot(&app, &token, id, json!({ "scene_number": 1 })).await["id"]
        .as_i64()
        .unwrap();

    let json = body_json(post_auth(app.clone(), &format!("/api/v1/shots/{shot_id}/complete"), &token).await).await;
    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["status_label"], "Completed");

    let json = body_json(post_auth(app.clone(), &format!("/api/v1/shots/{shot_id}/retake"), &token).await).await;
    assert_eq!(json["data"]["status"], "pending");

    let json = body_json(post_auth(app.clone(), &format!("/api/v1/shots/{shot_id}/toggle"), &token).await).await;
    assert_eq!(json["data"]["status"], "completed");
    let json = body_json(post_auth(app.clone(), &format!("/api/v1/shots/{shot_id}/toggle"), &token).await).await;
    assert_eq!(json["data"]["status"], "pending");

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/shots/{shot_id}"),
        json!({ "status": "in-progress", "notes": "Wait for golden hour" }),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in-progress");
    assert_eq!(json["data"]["notes"], "Wait for golden hour");

    let response = delete_auth(app.clone(), &format!("/api/v1/shots/{shot_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = post_auth(app, &format!("/api/v1/shots/{shot_id}/complete"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Shot images
// ---------------------------------------------------------------------------

/// Uploaded images are served publicly and removed with the shot's image.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_and_serve_shot_image(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;
    let shot_id = create_shot(&app, &token, id, json!({ "scene_number": 1 })).await["id"]
        .as_i64()
        .unwrap();
    let image_uri = format!("/api/v1/shots/{shot_id}/image");

    let response = upload_auth(
        app.clone(),
        Method::PUT,
        &image_uri,
        "frame.png",
        "image/png",
        &png_bytes(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let url = format!("{PUBLIC_BASE_URL}/storage/shot-images/shots/{shot_id}.png");
    assert_eq!(json["data"]["image_url"], url);

    let response = get(app.clone(), &format!("/storage/shot-images/shots/{shot_id}.png")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(body_bytes(response).await, png_bytes());

    let response = delete_auth(app.clone(), &image_uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["image_url"].is_null());

    let response = get(app, &format!("/storage/shot-images/shots/{shot_id}.png")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_rejects_non_images(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;
    let shot_id = create_shot(&app, &token, id, json!({ "scene_number": 1 })).await["id"]
        .as_i64()
        .unwrap();
    let image_uri = format!("/api/v1/shots/{shot_id}/image");

    let response = upload_auth(
        app.clone(),
        Method::PUT,
        &image_uri,
        "notes.txt",
        "text/plain",
        b"just some text",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Declared as an image but the bytes are not one.
    let response = upload_auth(
        app,
        Method::PUT,
        &image_uri,
        "fake.png",
        "image/png",
        b"definitely not a png",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// An image uploaded before its shot exists can be attached on create.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unattached_upload(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;

    let response = upload_auth(
        app.clone(),
        Method::POST,
        &format!("/api/v1/projects/{id}/shot-images"),
        "frame.png",
        "image/png",
        &png_bytes(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let key = json["data"]["key"].as_str().unwrap().to_string();
    let url = json["data"]["url"].as_str().unwrap().to_string();
    assert!(key.starts_with("shots/") && key.ends_with(".png"));

    let shot = create_shot(&app, &token, id, json!({ "scene_number": 1, "image_url": url })).await;
    assert_eq!(shot["image_url"], url.as_str());

    let response = get(app.clone(), &format!("/storage/shot-images/{key}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Nothing else points at the upload, so deleting the shot removes it.
    let shot_id = shot["id"].as_i64().unwrap();
    let response = delete_auth(app.clone(), &format!("/api/v1/shots/{shot_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(app, &format!("/storage/shot-images/{key}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Clearing an image only deletes objects the shot owns. A shot pointed at
/// another project's stored image, by any URL, leaves that image in place.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_image_spares_other_shots_images(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, _) = signup(&app, "owner@example.com").await;
    let (other, _) = signup(&app, "other@example.com").await;
    let id = create_project(&app, &owner, "Lighthouse").await;
    let other_id = create_project(&app, &other, "Harbor").await;

    let shot_id = create_shot(&app, &owner, id, json!({ "scene_number": 1 })).await["id"]
        .as_i64()
        .unwrap();
    let response = upload_auth(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/shots/{shot_id}/image"),
        "frame.png",
        "image/png",
        &png_bytes(),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let stored = format!("/storage/shot-images/shots/{shot_id}.png");

    let urls = [
        format!("https://elsewhere.example/x/shots/{shot_id}.png"),
        format!("{PUBLIC_BASE_URL}/storage/shot-images/shots/{shot_id}.png"),
    ];
    for url in urls {
        let foreign = create_shot(&app, &other, other_id, json!({ "scene_number": 1, "image_url": url }))
            .await["id"]
            .as_i64()
            .unwrap();

        let response = delete_auth(app.clone(), &format!("/api/v1/shots/{foreign}/image"), &other).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get(app.clone(), &stored).await.status(), StatusCode::OK, "{url}");

        let response = put_json_auth(
            app.clone(),
            &format!("/api/v1/shots/{foreign}"),
            json!({ "image_url": url }),
            &other,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = delete_auth(app.clone(), &format!("/api/v1/shots/{foreign}"), &other).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(get(app.clone(), &stored).await.status(), StatusCode::OK, "{url}");
    }
}

/// Deleting a project removes its shots' stored images.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_delete_removes_images(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;
    let shot_id = create_shot(&app, &token, id, json!({ "scene_number": 1 })).await["id"]
        .as_i64()
        .unwrap();
    upload_auth(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/shots/{shot_id}/image"),
        "frame.png",
        "image/png",
        &png_bytes(),
        &token,
    )
    .await;
    let stored = format!("/storage/shot-images/shots/{shot_id}.png");
    assert_eq!(get(app.clone(), &stored).await.status(), StatusCode::OK);

    let response = delete_auth(app.clone(), &format!("/api/v1/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(app, &stored).await.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Shot comments
// ---------------------------------------------------------------------------

/// Shot comments stay out of the project chat.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shot_comments(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = signup(&app, "owner@example.com").await;
    let id = create_project(&app, &token, "Lighthouse").await;
    let shot_id = create_shot(&app, &token, id, json!({ "scene_number": 1 })).await["id"]
        .as_i64()
        .unwrap();
    let comments = format!("/api/v1/shots/{shot_id}/comments");

    let response = post_json_auth(app.clone(), &comments, json!({ "content": "  Too dark  " }), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["content"], "Too dark");
    assert_eq!(json["data"]["shot_id"], shot_id);
    assert_eq!(json["data"]["author_label"], "You");

    let json = body_json(get_auth(app.clone(), &comments, &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = body_json(get_auth(app, &format!("/api/v1/projects/{id}/messages"), &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
