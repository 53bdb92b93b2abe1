//! Route definitions for the `/shots` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{chat, shot};
use crate::state::AppState;

/// Routes mounted at `/shots`.
///
/// ```text
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// POST   /{id}/duplicate    -> duplicate
/// POST   /{id}/complete     -> complete
/// POST   /{id}/retake       -> retake
/// POST   /{id}/toggle       -> toggle
/// PUT    /{id}/image        -> upload_image (multipart)
/// DELETE /{id}/image        -> remove_image
/// GET    /{id}/comments     -> chat::list_shot_comments
/// POST   /{id}/comments     -> chat::create_shot_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(shot::update).delete(shot::delete))
        .route("/{id}/duplicate", post(shot::duplicate))
        .route("/{id}/complete", post(shot::complete))
        .route("/{id}/retake", post(shot::retake))
        .route("/{id}/toggle", post(shot::toggle))
        .route(
            "/{id}/image",
            put(shot::upload_image).delete(shot::remove_image),
        )
        .route(
            "/{id}/comments",
            get(chat::list_shot_comments).post(chat::create_shot_comment),
        )
}
