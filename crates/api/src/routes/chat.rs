//! Route definitions for individual chat messages.

use axum::routing::put;
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/messages`.
///
/// ```text
/// PUT    /{id}    -> edit (author only)
/// DELETE /{id}    -> delete (author only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(chat::edit).delete(chat::delete))
}
