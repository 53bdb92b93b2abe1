pub mod auth;
pub mod chat;
pub mod collaborator;
pub mod health;
pub mod project;
pub mod scene;
pub mod shot;
pub mod storage;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{catalog, project as project_handlers, wizard};
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws?token=                                       WebSocket (invalidations)
///
/// /auth/signup                                     signup (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         session context
///
/// /catalog                                         option lists (GET)
/// /wizard/ideation                                 ideation draft check (POST)
/// /routes/resolve?path=                            client route guard (GET)
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/advance                           phase transition (POST)
/// /projects/{id}/wizard/{wizard}                   wizard progress
/// /projects/{id}/wizard/{wizard}/navigate          step move (POST)
/// /projects/{id}/story-structure|locations|...     planning editors (PUT)
/// /projects/{id}/schedule                          grouped schedule, replace
/// /projects/{id}/script                            save script (PUT)
/// /projects/{id}/script/scenes                     scenes from script (POST)
/// /projects/{id}/scenes                            list
/// /projects/{id}/scenes/sync                       materialize scenes (POST)
/// /projects/{id}/shots                             list, create
/// /projects/{id}/shot-images                       upload before create (POST)
/// /projects/{id}/messages                          list, post
/// /projects/{id}/messages/search                   search
/// /projects/{id}/messages/read                     read status, mark read
/// /projects/{id}/collaborators                     list, invite
///
/// /scenes/{id}                                     update
/// /scenes/{id}/checklist                           set all (PUT)
/// /scenes/{id}/checklist/toggle                    toggle one (POST)
/// /scenes/{id}/resources                           replace (PUT)
///
/// /shots/{id}                                      update, delete
/// /shots/{id}/duplicate|complete|retake|toggle     shot actions (POST)
/// /shots/{id}/image                                upload, remove
/// /shots/{id}/comments                             list, post
///
/// /messages/{id}                                   edit, delete (author)
///
/// /collaborators/{id}                              remove
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Realtime invalidation channel.
        .route("/ws", get(ws::ws_handler))
        // Authentication routes.
        .nest("/auth", auth::router())
        // Endpoints not tied to a stored project.
        .route("/catalog", get(catalog::get_catalog))
        .route("/wizard/ideation", post(wizard::check_ideation))
        .route("/routes/resolve", get(project_handlers::resolve_route))
        // Projects and everything scoped to one project.
        .nest("/projects", project::router())
        // Sub-resources addressed by their own id.
        .nest("/scenes", scene::router())
        .nest("/shots", shot::router())
        .nest("/messages", chat::router())
        .nest("/collaborators", collaborator::router())
}
