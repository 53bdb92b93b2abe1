//! Fixed option lists the wizards offer: shot catalogs, enum values with
//! their labels and colors, checklist items and planning categories.

use axum::Json;
use filmcraft_core::chat::MessageType;
use filmcraft_core::collaboration::{CollaboratorRole, FILM_ROLES};
use filmcraft_core::phase::ALL_PHASES;
use filmcraft_core::planning::{
    schedule_type_label, LOCATION_TYPES, RESOURCE_CATEGORIES, SCHEDULE_TYPES,
};
use filmcraft_core::scenes::{ChecklistItem, SCENE_CHECKLIST_ITEMS, SHOT_CHECKLIST_ITEMS};
use filmcraft_core::shots::{
    act_color, ShotPriority, ShotStatus, CAMERA_MOVEMENTS, SHOT_TYPES, STORY_ACTS,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;

/// A selectable value with its display label and, where the UI uses one, a
/// color.
#[derive(Debug, Serialize)]
pub struct CatalogOption {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

impl CatalogOption {
    fn plain(value: &'static str) -> Self {
        Self {
            value,
            label: value,
            color: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Catalog {
    pub phases: Vec<CatalogOption>,
    pub shot_types: &'static [&'static str],
    pub camera_movements: &'static [&'static str],
    pub shot_priorities: Vec<CatalogOption>,
    pub shot_statuses: Vec<CatalogOption>,
    pub story_acts: Vec<CatalogOption>,
    pub location_types: &'static [&'static str],
    pub resource_categories: &'static [&'static str],
    pub schedule_types: Vec<CatalogOption>,
    pub scene_checklist: &'static [ChecklistItem],
    pub shot_checklist: &'static [ChecklistItem],
    pub collaborator_roles: Vec<CatalogOption>,
    pub film_roles: Vec<CatalogOption>,
    pub message_types: Vec<CatalogOption>,
}

fn build_catalog() -> Catalog {
    Catalog {
        phases: ALL_PHASES
            .iter()
            .map(|p| CatalogOption {
                value: p.as_str(),
                label: p.label(),
                color: None,
            })
            .collect(),
        shot_types: SHOT_TYPES,
        camera_movements: CAMERA_MOVEMENTS,
        shot_priorities: ShotPriority::ALL
            .iter()
            .map(|p| CatalogOption {
                value: p.as_str(),
                label: p.as_str(),
                color: Some(p.color()),
            })
            .collect(),
        shot_statuses: ShotStatus::ALL
            .iter()
            .map(|s| CatalogOption {
                value: s.as_str(),
                label: s.label(),
                color: Some(s.color()),
            })
            .collect(),
        story_acts: STORY_ACTS
            .iter()
            .map(|&act| CatalogOption {
                color: Some(act_color(act)),
                ..CatalogOption::plain(act)
            })
            .collect(),
        location_types: LOCATION_TYPES,
        resource_categories: RESOURCE_CATEGORIES,
        schedule_types: SCHEDULE_TYPES
            .iter()
            .map(|&t| CatalogOption {
                value: t,
                label: schedule_type_label(t),
                color: None,
            })
            .collect(),
        scene_checklist: SCENE_CHECKLIST_ITEMS,
        shot_checklist: SHOT_CHECKLIST_ITEMS,
        collaborator_roles: CollaboratorRole::ALL
            .iter()
            .map(|r| CatalogOption::plain(r.as_str()))
            .collect(),
        film_roles: FILM_ROLES
            .iter()
            .map(|&(value, label)| CatalogOption {
                value,
                label,
                color: None,
            })
            .collect(),
        message_types: MessageType::ALL
            .iter()
            .map(|t| CatalogOption::plain(t.as_str()))
            .collect(),
    }
}

/// GET /api/v1/catalog
pub async fn get_catalog(_user: AuthUser) -> AppResult<Json<DataResponse<Catalog>>> {
    Ok(Json(DataResponse {
        data: build_catalog(),
    }))
}
