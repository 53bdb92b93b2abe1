//! Route definitions for individual collaborators.

use axum::routing::delete;
use axum::Router;

use crate::handlers::collaborator;
use crate::state::AppState;

/// Routes mounted at `/collaborators`.
///
/// ```text
/// DELETE /{id}    -> remove (admin permission)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(collaborator::remove))
}
