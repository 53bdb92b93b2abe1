//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers authorize against the owning project, delegate to the matching
//! repository in `filmcraft_db`, map errors via [`AppError`](crate::error::AppError),
//! and publish a change event after every successful mutation.

pub mod auth;
pub mod catalog;
pub mod chat;
pub mod collaborator;
pub mod planning;
pub mod project;
pub mod scene;
pub mod shot;
pub mod storage;
pub mod wizard;

use filmcraft_core::types::DbId;
use filmcraft_events::{ChangeEvent, ChangeTable};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Tell realtime subscribers that `table` changed for `project_id`.
pub(crate) fn publish_change(
    state: &AppState,
    project_id: DbId,
    table: ChangeTable,
    actor: &AuthUser,
) {
    state
        .event_bus
        .publish(ChangeEvent::new(project_id, table).with_actor(actor.user_id));
}
