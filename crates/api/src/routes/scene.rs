//! Route definitions for the `/scenes` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::scene;
use crate::state::AppState;

/// Routes mounted at `/scenes`.
///
/// ```text
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// POST   /{id}/checklist/toggle  -> toggle_checklist
/// PUT    /{id}/checklist         -> set_checklist
/// PUT    /{id}/resources         -> replace_resources
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(scene::update).delete(scene::delete))
        .route("/{id}/checklist/toggle", post(scene::toggle_checklist))
        .route("/{id}/checklist", put(scene::set_checklist))
        .route("/{id}/resources", put(scene::replace_resources))
}
