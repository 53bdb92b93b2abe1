//! Shot entity model and DTOs.

use filmcraft_core::shots::ShotRecord;
use filmcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A shot row from the `shots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shot {
    pub id: DbId,
    pub project_id: DbId,
    pub scene_number: i32,
    pub title: String,
    pub shot_type: String,
    pub camera_movement: String,
    pub description: String,
    pub duration: String,
    pub priority: String,
    pub status: String,
    pub notes: String,
    pub image_url: Option<String>,
    pub order_index: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ShotRecord for Shot {
    fn scene_number(&self) -> i32 {
        self.scene_number
    }

    fn status(&self) -> &str {
        &self.status
    }
}

/// DTO for inserting a shot. Every column is supplied by the caller.
#[derive(Debug, Clone)]
pub struct CreateShot {
    pub project_id: DbId,
    pub scene_number: i32,
    pub title: String,
    pub shot_type: String,
    pub camera_movement: String,
    pub description: String,
    pub duration: String,
    pub priority: String,
    pub status: String,
    pub notes: String,
    pub image_url: Option<String>,
    pub order_index: f64,
}

/// DTO for updating a shot. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShot {
    pub scene_number: Option<i32>,
    pub title: Option<String>,
    pub shot_type: Option<String>,
    pub camera_movement: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub order_index: Option<f64>,
}
