//! Project entity model and DTOs.

use filmcraft_core::error::CoreError;
use filmcraft_core::phase::ProjectPhase;
use filmcraft_core::planning::{Location, Resources, ScheduleEntry, StorySegment, TimelineItem};
use filmcraft_core::types::{DbId, Timestamp};
use filmcraft_core::wizard::{IdeationDraft, PlanningDraft};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub concept: String,
    pub project_type: String,
    pub target_audience: String,
    pub duration: String,
    pub tone: String,
    pub key_message: String,
    pub inspiration: String,
    pub unique_angle: String,
    pub phase: String,
    pub story_structure: Json<Vec<StorySegment>>,
    pub locations: Json<Vec<Location>>,
    pub resources: Json<Resources>,
    pub production_schedule: Json<Vec<ScheduleEntry>>,
    pub timeline: Json<Vec<TimelineItem>>,
    pub script: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn phase(&self) -> Result<ProjectPhase, CoreError> {
        ProjectPhase::from_str_db(&self.phase)
    }

    /// The ideation fields as the wizard sees them.
    pub fn ideation_draft(&self) -> IdeationDraft {
        IdeationDraft {
            title: self.title.clone(),
            project_type: self.project_type.clone(),
            duration: self.duration.clone(),
            concept: self.concept.clone(),
            key_message: self.key_message.clone(),
            target_audience: self.target_audience.clone(),
            tone: self.tone.clone(),
            inspiration: self.inspiration.clone(),
            unique_angle: self.unique_angle.clone(),
        }
    }

    /// The collections the planning wizard inspects.
    pub fn planning_draft(&self) -> PlanningDraft {
        PlanningDraft {
            story_structure: self.story_structure.0.clone(),
            resources: self.resources.0.clone(),
        }
    }
}

/// DTO for creating a project from a completed ideation wizard.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub owner_id: DbId,
    pub draft: IdeationDraft,
    pub phase: ProjectPhase,
}

/// DTO for updating project text fields. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub concept: Option<String>,
    pub project_type: Option<String>,
    pub target_audience: Option<String>,
    pub duration: Option<String>,
    pub tone: Option<String>,
    pub key_message: Option<String>,
    pub inspiration: Option<String>,
    pub unique_angle: Option<String>,
}

/// Which JSON collection column a planning sub-editor replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectCollection {
    StoryStructure,
    Locations,
    Resources,
    ProductionSchedule,
    Timeline,
}

impl ProjectCollection {
    pub fn column(self) -> &'static str {
        match self {
            Self::StoryStructure => "story_structure",
            Self::Locations => "locations",
            Self::Resources => "resources",
            Self::ProductionSchedule => "production_schedule",
            Self::Timeline => "timeline",
        }
    }
}
