//! Planning sub-editor records: story structure, locations, resources,
//! production schedule, and timeline.
//!
//! These collections are stored as JSON columns on the project row and are
//! always replaced wholesale on edit.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Resource category -> list of item names, in insertion order.
pub type Resources = IndexMap<String, Vec<String>>;

/// Default resource categories offered by the planning wizard.
pub const RESOURCE_CATEGORIES: &[&str] = &["Equipment", "Props", "Costumes", "Team", "Other"];

/// Location type tags.
pub const LOCATION_TYPES: &[&str] = &["Indoor", "Outdoor"];

/// Default location type for new locations and derived scenes.
pub const DEFAULT_LOCATION_TYPE: &str = "Indoor";

/// Default duration for a new story segment.
pub const DEFAULT_SEGMENT_DURATION: &str = "30 seconds";

// ---------------------------------------------------------------------------
// Story structure
// ---------------------------------------------------------------------------

/// One segment of the project's ordered story structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorySegment {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    /// Act tag, e.g. `setup`, `conflict`, `resolution`.
    #[serde(default)]
    pub act: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default)]
    pub resources: Option<Resources>,
}

impl StorySegment {
    /// A new segment with the given title and default duration.
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            duration: DEFAULT_SEGMENT_DURATION.to_string(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A shooting location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_location_type", rename = "type")]
    pub location_type: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub equipment_needed: Vec<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

fn default_location_type() -> String {
    DEFAULT_LOCATION_TYPE.to_string()
}

/// Validate a location list: every location needs a name and a known type.
pub fn validate_locations(locations: &[Location]) -> Result<(), CoreError> {
    for (index, location) in locations.iter().enumerate() {
        if location.name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Location {} requires a name",
                index + 1
            )));
        }
        if !LOCATION_TYPES.contains(&location.location_type.as_str()) {
            return Err(CoreError::Validation(format!(
                "Invalid location type '{}'. Must be one of: {LOCATION_TYPES:?}",
                location.location_type
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Trim items and drop blank ones and empty-named categories.
pub fn clean_resources(resources: Resources) -> Resources {
    resources
        .into_iter()
        .filter(|(category, _)| !category.trim().is_empty())
        .map(|(category, items)| (category.trim().to_string(), clean_resource_items(items)))
        .collect()
}

/// Trim every item and drop blank ones.
pub fn clean_resource_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Production schedule
// ---------------------------------------------------------------------------

/// Schedule entry types.
pub mod schedule_types {
    pub const PREP: &str = "prep";
    pub const SHOOT: &str = "shoot";
    pub const REVIEW: &str = "review";
}

/// The set of valid schedule entry types.
pub const SCHEDULE_TYPES: &[&str] = &[
    schedule_types::PREP,
    schedule_types::SHOOT,
    schedule_types::REVIEW,
];

/// Human-readable label for a schedule type. Unknown types fall back to "Other".
pub fn schedule_type_label(entry_type: &str) -> &'static str {
    match entry_type {
        schedule_types::PREP => "Pre-production",
        schedule_types::SHOOT => "Shooting",
        schedule_types::REVIEW => "Review/Editing",
        _ => "Other",
    }
}

/// One production schedule entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub title: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub crew: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub weather_consideration: bool,
}

/// Validate a single schedule entry.
pub fn validate_schedule_entry(entry: &ScheduleEntry) -> Result<(), CoreError> {
    if entry.title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Schedule entry requires a title".to_string(),
        ));
    }
    if !SCHEDULE_TYPES.contains(&entry.entry_type.as_str()) {
        return Err(CoreError::Validation(format!(
            "Invalid schedule type '{}'. Must be one of: {SCHEDULE_TYPES:?}",
            entry.entry_type
        )));
    }
    chrono::NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").map_err(|_| {
        CoreError::Validation(format!("Invalid schedule date '{}'", entry.date))
    })?;
    let start = parse_time(&entry.start_time)?;
    let end = parse_time(&entry.end_time)?;
    if start >= end {
        return Err(CoreError::Validation(format!(
            "Schedule entry '{}' must end after it starts",
            entry.title
        )));
    }
    Ok(())
}

fn parse_time(value: &str) -> Result<chrono::NaiveTime, CoreError> {
    chrono::NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| CoreError::Validation(format!("Invalid time '{value}'. Expected HH:MM")))
}

/// Group schedule entries by date, dates ascending, entries by start time.
pub fn group_schedule_by_date(entries: &[ScheduleEntry]) -> Vec<(String, Vec<ScheduleEntry>)> {
    let mut grouped: IndexMap<String, Vec<ScheduleEntry>> = IndexMap::new();
    for entry in entries {
        grouped
            .entry(entry.date.clone())
            .or_default()
            .push(entry.clone());
    }
    grouped.sort_keys();
    grouped
        .into_iter()
        .map(|(date, mut items)| {
            items.sort_by(|a, b| a.start_time.cmp(&b.start_time));
            (date, items)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// A pre-production task on the planning timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub task: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default = "default_timeline_status")]
    pub status: String,
}

fn default_timeline_status() -> String {
    "pending".to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, start: &str, end: &str) -> ScheduleEntry {
        ScheduleEntry {
            title: format!("{date} {start}"),
            entry_type: "shoot".to_string(),
            date: date.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn schedule_entry_valid() {
        assert!(validate_schedule_entry(&entry("2026-03-01", "09:00", "17:00")).is_ok());
    }

    #[test]
    fn schedule_entry_rejects_inverted_times() {
        assert!(validate_schedule_entry(&entry("2026-03-01", "17:00", "09:00")).is_err());
        assert!(validate_schedule_entry(&entry("2026-03-01", "09:00", "09:00")).is_err());
    }

    #[test]
    fn schedule_entry_rejects_bad_type_and_date() {
        let mut e = entry("2026-03-01", "09:00", "10:00");
        e.entry_type = "party".to_string();
        assert!(validate_schedule_entry(&e).is_err());

        let e = entry("March 1st", "09:00", "10:00");
        assert!(validate_schedule_entry(&e).is_err());
    }

    #[test]
    fn schedule_groups_sorted_by_date_then_start() {
        let entries = vec![
            entry("2026-03-02", "13:00", "14:00"),
            entry("2026-03-01", "15:00", "16:00"),
            entry("2026-03-02", "08:00", "09:00"),
            entry("2026-03-01", "06:00", "07:00"),
        ];
        let grouped = group_schedule_by_date(&entries);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "2026-03-01");
        assert_eq!(grouped[0].1[0].start_time, "06:00");
        assert_eq!(grouped[0].1[1].start_time, "15:00");
        assert_eq!(grouped[1].0, "2026-03-02");
        assert_eq!(grouped[1].1[0].start_time, "08:00");
    }

    #[test]
    fn resources_are_cleaned_and_keep_order() {
        let mut resources = Resources::new();
        resources.insert("Props".to_string(), vec![" chair ".into(), "  ".into()]);
        resources.insert("Equipment".to_string(), vec!["camera".into()]);
        resources.insert(" ".to_string(), vec!["lost".into()]);

        let cleaned = clean_resources(resources);
        let keys: Vec<&str> = cleaned.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Props", "Equipment"]);
        assert_eq!(cleaned["Props"], vec!["chair".to_string()]);
    }

    #[test]
    fn location_defaults_deserialize() {
        let location: Location = serde_json::from_str(r#"{"name": "Warehouse"}"#).unwrap();
        assert_eq!(location.location_type, "Indoor");
        assert!(validate_locations(&[location]).is_ok());
    }

    #[test]
    fn location_without_name_is_invalid() {
        let location = Location {
            location_type: "Outdoor".to_string(),
            ..Default::default()
        };
        assert!(validate_locations(&[location]).is_err());
    }

    #[test]
    fn schedule_type_labels_fall_back() {
        assert_eq!(schedule_type_label("prep"), "Pre-production");
        assert_eq!(schedule_type_label("wrap"), "Other");
    }
}
