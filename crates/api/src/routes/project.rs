//! Route definitions for the `/projects` resource.
//!
//! Also nests everything scoped to one project: planning editors, scenes,
//! shots, chat and collaborators.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{chat, collaborator, planning, project, scene, shot, wizard};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// POST   /{id}/advance                      -> advance
/// GET    /{id}/wizard/{wizard}              -> progress
/// POST   /{id}/wizard/{wizard}/navigate     -> navigate_project
///
/// PUT    /{id}/story-structure              -> replace_story_structure
/// PUT    /{id}/locations                    -> replace_locations
/// PUT    /{id}/resources                    -> replace_resources
/// GET    /{id}/schedule                     -> get_schedule
/// PUT    /{id}/schedule                     -> replace_schedule
/// PUT    /{id}/timeline                     -> replace_timeline
/// PUT    /{id}/script                       -> replace_script
/// POST   /{id}/script/scenes                -> generate_scenes_from_script
///
/// GET    /{id}/scenes                       -> scene::list
/// POST   /{id}/scenes/sync                  -> scene::sync
/// GET    /{id}/shots                        -> shot::list
/// POST   /{id}/shots                        -> shot::create
/// POST   /{id}/shot-images                  -> shot::upload_unattached_image
///
/// GET    /{id}/messages                     -> chat::list
/// POST   /{id}/messages                     -> chat::create
/// GET    /{id}/messages/search              -> chat::search
/// GET    /{id}/messages/read                -> chat::get_read_status
/// PUT    /{id}/messages/read                -> chat::mark_read
///
/// GET    /{id}/collaborators                -> collaborator::list
/// POST   /{id}/collaborators                -> collaborator::invite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/advance", post(project::advance))
        .route("/{id}/wizard/{wizard}", get(wizard::progress))
        .route(
            "/{id}/wizard/{wizard}/navigate",
            post(wizard::navigate_project),
        )
        // Planning editors.
        .route(
            "/{id}/story-structure",
            put(planning::replace_story_structure),
        )
        .route("/{id}/locations", put(planning::replace_locations))
        .route("/{id}/resources", put(planning::replace_resources))
        .route(
            "/{id}/schedule",
            get(planning::get_schedule).put(planning::replace_schedule),
        )
        .route("/{id}/timeline", put(planning::replace_timeline))
        .route("/{id}/script", put(planning::replace_script))
        .route(
            "/{id}/script/scenes",
            post(planning::generate_scenes_from_script),
        )
        // Scenes and shots.
        .route("/{id}/scenes", get(scene::list))
        .route("/{id}/scenes/sync", post(scene::sync))
        .route("/{id}/shots", get(shot::list).post(shot::create))
        .route("/{id}/shot-images", post(shot::upload_unattached_image))
        // Chat.
        .route("/{id}/messages", get(chat::list).post(chat::create))
        .route("/{id}/messages/search", get(chat::search))
        .route(
            "/{id}/messages/read",
            get(chat::get_read_status).put(chat::mark_read),
        )
        // Team.
        .route(
            "/{id}/collaborators",
            get(collaborator::list).post(collaborator::invite),
        )
}
