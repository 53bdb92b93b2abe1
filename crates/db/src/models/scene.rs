//! Scene entity model and DTOs.

use filmcraft_core::planning::Resources;
use filmcraft_core::scenes::{Checklist, SceneDraft};
use filmcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A scene row from the `scenes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scene {
    pub id: DbId,
    pub project_id: DbId,
    pub scene_number: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub location_type: String,
    pub content: Option<String>,
    pub checklist: Json<Checklist>,
    pub resources: Json<Resources>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a scene.
#[derive(Debug, Clone)]
pub struct CreateScene {
    pub project_id: DbId,
    pub draft: SceneDraft,
}

/// DTO for updating a scene's descriptive fields. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateScene {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub location_type: Option<String>,
    pub content: Option<String>,
}
