//! Public object URLs, mounted at the root next to `/health`.

use axum::routing::get;
use axum::Router;

use crate::handlers::storage;
use crate::state::AppState;

/// ```text
/// GET /storage/shot-images/{*key}    -> get_shot_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/storage/shot-images/{*key}",
        get(storage::get_shot_image),
    )
}
