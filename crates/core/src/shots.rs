//! Shot list rules: priority and status mappings, catalogs, defaults for new
//! and duplicated shots, and completion progress.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Display color for anything that does not map to a known value.
pub const DEFAULT_COLOR: &str = "gray";

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

pub const SHOT_TYPES: &[&str] = &[
    "Wide Shot",
    "Medium Shot",
    "Close-up",
    "Extreme Close-up",
    "Over-the-shoulder",
    "POV Shot",
    "Establishing Shot",
    "Cutaway",
    "B-Roll",
    "Talking Head",
    "Insert Shot",
    "Reaction Shot",
];

pub const CAMERA_MOVEMENTS: &[&str] = &[
    "Static",
    "Pan Left",
    "Pan Right",
    "Tilt Up",
    "Tilt Down",
    "Zoom In",
    "Zoom Out",
    "Dolly In",
    "Dolly Out",
    "Tracking Left",
    "Tracking Right",
    "Handheld",
    "Steadicam",
    "Crane Up",
    "Crane Down",
    "Gimbal Movement",
    "Slider Left",
    "Slider Right",
];

pub const DEFAULT_SHOT_TYPE: &str = "Medium Shot";
pub const DEFAULT_CAMERA_MOVEMENT: &str = "Static";
pub const DEFAULT_SHOT_DURATION: &str = "30 seconds";

/// Suffix appended to the title of a duplicated shot.
pub const COPY_SUFFIX: &str = " (Copy)";

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotPriority {
    High,
    Medium,
    Low,
}

impl ShotPriority {
    pub const ALL: &'static [ShotPriority] = &[Self::High, Self::Medium, Self::Low];

    pub fn from_name(s: &str) -> Result<Self, CoreError> {
        match s {
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            _ => Err(CoreError::Validation(format!(
                "Invalid priority '{s}'. Must be one of: High, Medium, Low"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::High => "red",
            Self::Medium => "yellow",
            Self::Low => "green",
        }
    }
}

/// Color for a stored priority string. Unknown values get the default color.
pub fn priority_color(priority: &str) -> &'static str {
    ShotPriority::from_name(priority).map_or(DEFAULT_COLOR, ShotPriority::color)
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShotStatus {
    Pending,
    InProgress,
    Completed,
}

impl ShotStatus {
    pub const ALL: &'static [ShotStatus] = &[Self::Pending, Self::InProgress, Self::Completed];

    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(CoreError::Validation(format!(
                "Invalid shot status '{s}'. Must be one of: pending, in-progress, completed"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Pending => "gray",
            Self::InProgress => "blue",
            Self::Completed => "green",
        }
    }

    /// Completed shots go back to pending; anything else becomes completed.
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Pending,
            Self::Pending | Self::InProgress => Self::Completed,
        }
    }
}

/// Color for a stored status string. Unknown values get the default color.
pub fn status_color(status: &str) -> &'static str {
    ShotStatus::from_str_db(status).map_or(DEFAULT_COLOR, ShotStatus::color)
}

/// Label for a stored status string. Unknown values are shown as-is.
pub fn status_label(status: &str) -> String {
    ShotStatus::from_str_db(status).map_or_else(|_| status.to_string(), |s| s.label().to_string())
}

/// Act tags a story segment may carry.
pub const STORY_ACTS: &[&str] = &["setup", "conflict", "resolution"];

/// Banner color for a story act tag.
pub fn act_color(act: &str) -> &'static str {
    match act {
        "setup" => "blue",
        "conflict" => "orange",
        "resolution" => "green",
        _ => DEFAULT_COLOR,
    }
}

// ---------------------------------------------------------------------------
// New and duplicated shots
// ---------------------------------------------------------------------------

/// Field values for a shot added to a scene with the "add shot" action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotDefaults {
    pub title: String,
    pub shot_type: &'static str,
    pub camera_movement: &'static str,
    pub duration: &'static str,
    pub priority: ShotPriority,
    pub status: ShotStatus,
    pub order_index: f64,
}

/// Defaults for a new shot given the scene title and how many shots the
/// scene already has.
pub fn new_shot_defaults(scene_title: &str, existing_in_scene: usize) -> ShotDefaults {
    let scene = if scene_title.trim().is_empty() {
        "Scene"
    } else {
        scene_title.trim()
    };
    ShotDefaults {
        title: format!("{scene} - Shot {}", existing_in_scene + 1),
        shot_type: DEFAULT_SHOT_TYPE,
        camera_movement: DEFAULT_CAMERA_MOVEMENT,
        duration: DEFAULT_SHOT_DURATION,
        priority: ShotPriority::Medium,
        status: ShotStatus::Pending,
        order_index: (existing_in_scene + 1) as f64,
    }
}

/// A duplicate sorts directly after its source.
pub fn duplicate_order_index(order_index: f64) -> f64 {
    order_index + 0.5
}

pub fn duplicate_title(title: &str) -> String {
    format!("{title}{COPY_SUFFIX}")
}

/// Validate optional catalog fields on a shot create/update.
pub fn validate_shot_fields(
    priority: Option<&str>,
    status: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(p) = priority {
        ShotPriority::from_name(p)?;
    }
    if let Some(s) = status {
        ShotStatus::from_str_db(s)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Anything that can report which scene a shot belongs to and its status.
pub trait ShotRecord {
    fn scene_number(&self) -> i32;
    fn status(&self) -> &str;
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round() as u8
}

fn is_completed<S: ShotRecord>(shot: &S) -> bool {
    shot.status() == ShotStatus::Completed.as_str()
}

/// Percentage of completed shots within one scene. 0 when it has none.
pub fn scene_progress<S: ShotRecord>(shots: &[S], scene_number: i32) -> u8 {
    let in_scene: Vec<&S> = shots
        .iter()
        .filter(|s| s.scene_number() == scene_number)
        .collect();
    let done = in_scene.iter().filter(|s| is_completed(**s)).count();
    percent(done, in_scene.len())
}

/// Percentage of completed shots across the project. 0 when it has none.
pub fn overall_progress<S: ShotRecord>(shots: &[S]) -> u8 {
    let done = shots.iter().filter(|s| is_completed(*s)).count();
    percent(done, shots.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
