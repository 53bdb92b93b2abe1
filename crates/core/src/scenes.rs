//! Scene rules: readiness checklists and materializing scenes from the
//! story structure or a segmented script.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::planning::{Resources, StorySegment, DEFAULT_LOCATION_TYPE};
use crate::script::ScriptScene;

/// Checklist item key -> checked.
pub type Checklist = IndexMap<String, bool>;

/// A checklist entry: stored key and display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub key: &'static str,
    pub label: &'static str,
}

/// Per-scene readiness items checked before shooting starts.
pub const SCENE_CHECKLIST_ITEMS: &[ChecklistItem] = &[
    ChecklistItem { key: "lighting_setup", label: "Lighting Setup" },
    ChecklistItem { key: "audio_check", label: "Audio Check" },
    ChecklistItem { key: "location_ready", label: "Location Ready" },
    ChecklistItem { key: "props_ready", label: "Props Ready" },
    ChecklistItem { key: "equipment_check", label: "Equipment Check" },
    ChecklistItem { key: "team_ready", label: "Team Ready" },
];

/// Per-shot pre-roll items.
pub const SHOT_CHECKLIST_ITEMS: &[ChecklistItem] = &[
    ChecklistItem { key: "lighting", label: "Lighting" },
    ChecklistItem { key: "audio", label: "Audio" },
    ChecklistItem { key: "framing", label: "Framing" },
    ChecklistItem { key: "background", label: "Background" },
    ChecklistItem { key: "battery", label: "Battery" },
    ChecklistItem { key: "storage", label: "Storage" },
];

/// Description given to the fallback scene of a project without a story.
pub const DEFAULT_SCENE_DESCRIPTION: &str = "Main scene";

// ---------------------------------------------------------------------------
// Checklists
// ---------------------------------------------------------------------------

fn validate_key(items: &[ChecklistItem], key: &str) -> Result<(), CoreError> {
    if items.iter().any(|i| i.key == key) {
        return Ok(());
    }
    let known: Vec<&str> = items.iter().map(|i| i.key).collect();
    Err(CoreError::Validation(format!(
        "Unknown checklist item '{key}'. Must be one of: {}",
        known.join(", ")
    )))
}

/// Percentage of checked items. Missing keys count as unchecked.
pub fn checklist_progress(items: &[ChecklistItem], checklist: &Checklist) -> u8 {
    if items.is_empty() {
        return 0;
    }
    let checked = items
        .iter()
        .filter(|i| checklist.get(i.key).copied().unwrap_or(false))
        .count();
    ((checked as f64 / items.len() as f64) * 100.0).round() as u8
}

pub fn is_checklist_complete(items: &[ChecklistItem], checklist: &Checklist) -> bool {
    items
        .iter()
        .all(|i| checklist.get(i.key).copied().unwrap_or(false))
}

/// Flip one item and return its new value.
pub fn toggle_checklist_item(
    items: &[ChecklistItem],
    checklist: &mut Checklist,
    key: &str,
) -> Result<bool, CoreError> {
    validate_key(items, key)?;
    let entry = checklist.entry(key.to_string()).or_insert(false);
    *entry = !*entry;
    Ok(*entry)
}

/// A checklist with every item set to `checked`.
pub fn set_all(items: &[ChecklistItem], checked: bool) -> Checklist {
    items
        .iter()
        .map(|i| (i.key.to_string(), checked))
        .collect()
}

// ---------------------------------------------------------------------------
// Scene drafts
// ---------------------------------------------------------------------------

/// A scene ready to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDraft {
    pub scene_number: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub location_type: String,
    pub content: Option<String>,
    pub resources: Resources,
}

/// One scene per story segment, numbered from 1. A project without story
/// segments gets a single default scene.
pub fn scenes_from_story_structure(
    segments: &[StorySegment],
    project_resources: &Resources,
) -> Vec<SceneDraft> {
    if segments.is_empty() {
        return vec![SceneDraft {
            scene_number: 1,
            title: "Scene 1".to_string(),
            description: DEFAULT_SCENE_DESCRIPTION.to_string(),
            location: String::new(),
            location_type: DEFAULT_LOCATION_TYPE.to_string(),
            content: None,
            resources: Resources::new(),
        }];
    }

    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let scene_number = index as i32 + 1;
            SceneDraft {
                scene_number,
                title: non_blank_or(&segment.title, || format!("Scene {scene_number}")),
                description: segment.description.clone(),
                location: segment.location.clone().unwrap_or_default(),
                location_type: segment
                    .location_type
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or(DEFAULT_LOCATION_TYPE)
                    .to_string(),
                content: None,
                resources: segment
                    .resources
                    .clone()
                    .unwrap_or_else(|| project_resources.clone()),
            }
        })
        .collect()
}

/// Convert segmented script scenes into scene drafts.
pub fn scenes_from_script(script_scenes: &[ScriptScene]) -> Vec<SceneDraft> {
    script_scenes
        .iter()
        .map(|s| SceneDraft {
            scene_number: s.scene_number,
            title: s.title.clone(),
            description: s.description.clone(),
            location: String::new(),
            location_type: DEFAULT_LOCATION_TYPE.to_string(),
            content: Some(s.content.clone()),
            resources: Resources::new(),
        })
        .collect()
}

fn non_blank_or(value: &str, fallback: impl FnOnce() -> String) -> String {
    if value.trim().is_empty() {
        fallback()
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
