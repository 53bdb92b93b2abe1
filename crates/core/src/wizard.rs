//! Ideation and planning wizard step definitions and completion predicates.
//!
//! A step is complete when its required fields are present. A text field
//! counts as present iff it is non-blank after trimming. The API uses these
//! predicates both to report progress and to refuse advancing or finishing
//! a wizard with incomplete steps.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::planning::{Resources, StorySegment};

/// Whether a text field counts as filled in.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// The fields collected by the ideation wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdeationDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub concept: String,
    #[serde(default)]
    pub key_message: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub inspiration: String,
    #[serde(default)]
    pub unique_angle: String,
}

/// The collections inspected by the planning wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningDraft {
    #[serde(default)]
    pub story_structure: Vec<StorySegment>,
    #[serde(default)]
    pub resources: Resources,
}

// ---------------------------------------------------------------------------
// Ideation steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeationStep {
    Basics,
    Concept,
    Audience,
}

impl IdeationStep {
    pub const ALL: &'static [IdeationStep] = &[Self::Basics, Self::Concept, Self::Audience];

    /// Convert a 1-based step number to a step.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Basics),
            2 => Ok(Self::Concept),
            3 => Ok(Self::Audience),
            _ => Err(CoreError::Validation(format!(
                "Invalid ideation step {n}. Must be between 1 and 3"
            ))),
        }
    }

    pub fn to_number(self) -> u8 {
        match self {
            Self::Basics => 1,
            Self::Concept => 2,
            Self::Audience => 3,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Basics => "basics",
            Self::Concept => "concept",
            Self::Audience => "audience",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Basics => "Project Basics",
            Self::Concept => "Core Concept",
            Self::Audience => "Audience & Tone",
        }
    }

    /// Names of the required fields that are still blank.
    pub fn missing_fields(self, draft: &IdeationDraft) -> Vec<&'static str> {
        let required: Vec<(&'static str, &str)> = match self {
            Self::Basics => vec![
                ("title", draft.title.as_str()),
                ("project_type", draft.project_type.as_str()),
                ("duration", draft.duration.as_str()),
            ],
            Self::Concept => vec![
                ("concept", draft.concept.as_str()),
                ("key_message", draft.key_message.as_str()),
            ],
            Self::Audience => vec![
                ("target_audience", draft.target_audience.as_str()),
                ("tone", draft.tone.as_str()),
            ],
        };
        required
            .into_iter()
            .filter(|(_, value)| !is_present(value))
            .map(|(name, _)| name)
            .collect()
    }

    pub fn is_complete(self, draft: &IdeationDraft) -> bool {
        self.missing_fields(draft).is_empty()
    }
}

// ---------------------------------------------------------------------------
// Planning steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningStep {
    StoryScript,
    Shots,
    Schedule,
    Resources,
}

impl PlanningStep {
    pub const ALL: &'static [PlanningStep] = &[
        Self::StoryScript,
        Self::Shots,
        Self::Schedule,
        Self::Resources,
    ];

    /// Convert a 1-based step number to a step.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::StoryScript),
            2 => Ok(Self::Shots),
            3 => Ok(Self::Schedule),
            4 => Ok(Self::Resources),
            _ => Err(CoreError::Validation(format!(
                "Invalid planning step {n}. Must be between 1 and 4"
            ))),
        }
    }

    pub fn to_number(self) -> u8 {
        match self {
            Self::StoryScript => 1,
            Self::Shots => 2,
            Self::Schedule => 3,
            Self::Resources => 4,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::StoryScript => "story-script",
            Self::Shots => "shots",
            Self::Schedule => "schedule",
            Self::Resources => "resources",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StoryScript => "Story & Script",
            Self::Shots => "Shot List",
            Self::Schedule => "Schedule",
            Self::Resources => "Resources",
        }
    }

    /// Shot list and schedule are optional and always count as complete.
    pub fn missing_fields(self, draft: &PlanningDraft) -> Vec<&'static str> {
        match self {
            Self::StoryScript if draft.story_structure.is_empty() => vec!["story_structure"],
            Self::Resources if draft.resources.is_empty() => vec!["resources"],
            _ => Vec::new(),
        }
    }

    pub fn is_complete(self, draft: &PlanningDraft) -> bool {
        self.missing_fields(draft).is_empty()
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepProgress {
    /// 1-based.
    pub index: u8,
    pub id: &'static str,
    pub title: &'static str,
    pub complete: bool,
    pub missing_fields: Vec<&'static str>,
}

/// Per-step completion report for a wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardProgress {
    pub steps: Vec<StepProgress>,
    pub can_finish: bool,
}

impl WizardProgress {
    fn from_steps(steps: Vec<StepProgress>) -> Self {
        let can_finish = steps.iter().all(|s| s.complete);
        Self { steps, can_finish }
    }

    /// 1-based number of the first incomplete step, if any.
    pub fn first_incomplete(&self) -> Option<u8> {
        self.steps.iter().find(|s| !s.complete).map(|s| s.index)
    }
}

pub fn ideation_progress(draft: &IdeationDraft) -> WizardProgress {
    WizardProgress::from_steps(
        IdeationStep::ALL
            .iter()
            .map(|step| {
                let missing = step.missing_fields(draft);
                StepProgress {
                    index: step.to_number(),
                    id: step.id(),
                    title: step.label(),
                    complete: missing.is_empty(),
                    missing_fields: missing,
                }
            })
            .collect(),
    )
}

pub fn planning_progress(draft: &PlanningDraft) -> WizardProgress {
    WizardProgress::from_steps(
        PlanningStep::ALL
            .iter()
            .map(|step| {
                let missing = step.missing_fields(draft);
                StepProgress {
                    index: step.to_number(),
                    id: step.id(),
                    title: step.label(),
                    complete: missing.is_empty(),
                    missing_fields: missing,
                }
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate moving between two 1-based wizard steps.
///
/// Moving back to any earlier step is allowed. Moving forward is allowed
/// one step at a time and only when the current step is complete.
pub fn validate_step_navigation(
    current: u8,
    next: u8,
    total_steps: u8,
    current_complete: bool,
) -> Result<(), CoreError> {
    if current < 1 || current > total_steps {
        return Err(CoreError::Validation(format!(
            "Current step {current} is out of range (1..{total_steps})"
        )));
    }
    if next < 1 || next > total_steps {
        return Err(CoreError::Validation(format!(
            "Next step {next} is out of range (1..{total_steps})"
        )));
    }
    if next <= current {
        return Ok(());
    }
    if next - current > 1 {
        return Err(CoreError::Validation(format!(
            "Cannot skip from step {current} to step {next}. Steps advance one at a time."
        )));
    }
    if !current_complete {
        return Err(CoreError::Validation(format!(
            "Step {current} is incomplete"
        )));
    }
    Ok(())
}

/// Require every ideation step to be complete.
pub fn validate_ideation_complete(draft: &IdeationDraft) -> Result<(), CoreError> {
    for step in IdeationStep::ALL {
        let missing = step.missing_fields(draft);
        if let Some(field) = missing.first() {
            return Err(CoreError::Validation(format!(
                "'{field}' is required ({})",
                step.label()
            )));
        }
    }
    Ok(())
}

/// Require every planning step to be complete.
pub fn validate_planning_complete(draft: &PlanningDraft) -> Result<(), CoreError> {
    for step in PlanningStep::ALL {
        if !step.is_complete(draft) {
            return Err(CoreError::Validation(format!(
                "Planning step '{}' is incomplete",
                step.label()
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
