//! Script segmentation.
//!
//! Splits free-form script text into scenes at heading lines. A heading is a
//! line that (trimmed, upper-cased) starts with `SCENE`, `INT.`, or `EXT.`,
//! or that contains `FADE IN` or `CUT TO`.

use serde::{Deserialize, Serialize};

/// Heading prefixes that start a new scene.
pub const SCENE_HEADING_PREFIXES: &[&str] = &["SCENE", "INT.", "EXT."];

/// Transition markers that start a new scene wherever they appear in a line.
pub const SCENE_TRANSITION_MARKERS: &[&str] = &["FADE IN", "CUT TO"];

/// Body lines at or below this many characters never become a description.
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// Descriptions are cut to this many characters before the ellipsis.
pub const DESCRIPTION_MAX_CHARS: usize = 100;

/// One scene detected in a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptScene {
    pub scene_number: i32,
    pub title: String,
    pub description: String,
    pub content: String,
}

/// Whether a line starts a new scene.
pub fn is_scene_heading(line: &str) -> bool {
    let upper = line.trim().to_uppercase();
    SCENE_HEADING_PREFIXES.iter().any(|p| upper.starts_with(p))
        || SCENE_TRANSITION_MARKERS.iter().any(|m| upper.contains(m))
}

/// Split script text into consecutively numbered scenes.
///
/// Lines before the first heading are dropped. Blank lines are skipped.
pub fn segment_script(text: &str) -> Vec<ScriptScene> {
    let mut scenes: Vec<ScriptScene> = Vec::new();

    for line in text.split('\n') {
        let trimmed = line.trim();

        if is_scene_heading(line) {
            let scene_number = scenes.len() as i32 + 1;
            let title = if trimmed.is_empty() {
                format!("Scene {scene_number}")
            } else {
                trimmed.to_string()
            };
            scenes.push(ScriptScene {
                scene_number,
                title,
                description: String::new(),
                content: trimmed.to_string(),
            });
            continue;
        }

        let Some(current) = scenes.last_mut() else {
            continue;
        };
        if trimmed.is_empty() {
            continue;
        }

        current.content.push('\n');
        current.content.push_str(line);

        if current.description.is_empty() && trimmed.chars().count() > DESCRIPTION_MIN_CHARS {
            let mut description: String = trimmed.chars().take(DESCRIPTION_MAX_CHARS).collect();
            description.push_str("...");
            current.description = description;
        }
    }

    scenes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_scene_script() {
        let scenes =
            segment_script("SCENE 1 - INT. ROOM\nHello there.\nSCENE 2 - EXT. PARK\nWide shot.");
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].scene_number, 1);
        assert_eq!(scenes[0].title, "SCENE 1 - INT. ROOM");
        assert!(scenes[0].content.contains("Hello there."));
        assert!(!scenes[0].content.contains("Wide shot."));
        assert_eq!(scenes[1].scene_number, 2);
        assert!(scenes[1].content.contains("Wide shot."));
    }

    #[test]
    fn headings_are_case_insensitive() {
        let scenes = segment_script("int. kitchen - day\nShe cooks.\next. street - night\nRain.");
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[1].title, "ext. street - night");
    }

    #[test]
    fn transition_markers_anywhere_in_line() {
        let scenes = segment_script("  Slow FADE IN:\nThe sun rises.\nHard cut to black");
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].title, "Slow FADE IN:");
    }

    #[test]
    fn preamble_before_first_heading_is_dropped() {
        let scenes = segment_script("Title page\nBy Someone\nSCENE ONE\nAction line here.");
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].content, "SCENE ONE\nAction line here.");
    }

    #[test]
    fn description_from_first_long_line() {
        let scenes = segment_script("SCENE 1\nShort.\nThis line is long enough.\nAnother long line.");
        assert_eq!(scenes[0].description, "This line is long enough....");
    }

    #[test]
    fn description_threshold_is_exclusive() {
        // Exactly ten characters does not qualify.
        let scenes = segment_script("SCENE 1\n0123456789");
        assert_eq!(scenes[0].description, "");
    }

    #[test]
    fn description_truncated_to_limit() {
        let long = "x".repeat(150);
        let scenes = segment_script(&format!("SCENE 1\n{long}"));
        assert_eq!(scenes[0].description.len(), DESCRIPTION_MAX_CHARS + 3);
        assert!(scenes[0].description.ends_with("..."));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let scenes = segment_script("SCENE 1\n\n   \nBody");
        assert_eq!(scenes[0].content, "SCENE 1\nBody");
    }

    #[test]
    fn empty_script_has_no_scenes() {
        assert!(segment_script("").is_empty());
        assert!(segment_script("   \n\n").is_empty());
        assert!(segment_script("just some prose\nwithout headings").is_empty());
    }
}
