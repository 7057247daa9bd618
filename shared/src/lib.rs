use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a mood entry note, in characters
pub const NOTE_MAX_LEN: usize = 500;

/// Bio assigned to a user on first login, before they write their own
pub const DEFAULT_BIO: &str = "Finding peace one day at a time.";

/// The preset mood vocabulary offered by the dashboard
///
/// Entries may carry other labels (custom moods are plain strings), but the
/// insight heuristics and icon lookups are tuned to this set.
pub const MOOD_LABELS: [&str; 5] = ["Happy", "Sad", "Stressed", "Tired", "Neutral"];

/// Subset of the vocabulary treated as negative by the insight heuristics
pub const NEGATIVE_MOODS: [&str; 3] = ["Stressed", "Sad", "Tired"];

/// Context tags the dashboard offers when logging a mood
pub const KNOWN_TAGS: [&str; 5] = ["#Work", "#Sleep", "#Social", "#Health", "#Family"];

/// Identifier of a top-level screen in the client shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Page {
    Landing,
    Auth,
    Dashboard,
    History,
    Chat,
    Toolkit,
    Profile,
}

/// A registered user, keyed by email
///
/// `email` is the only stable identity: logging in twice with the same email
/// must resolve to the same record. `id` is assigned by whichever store
/// persists the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    /// Free-text bio shown on the profile page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Opaque image reference for the profile avatar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Lifestyle metrics optionally attached to a mood entry
///
/// All values are non-negative by convention; the wire format is camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleStats {
    pub sleep_hours: f64,
    pub water_ounces: f64,
    pub mindful_minutes: f64,
    pub steps: f64,
}

/// One journaled emotional moment
///
/// Entries are immutable after creation - there is no edit or delete
/// operation anywhere in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// RFC 3339 timestamp of when the moment was logged
    pub date: String,
    /// Mood label, usually one of MOOD_LABELS but custom labels are allowed
    pub mood: String,
    /// Free-text note (max 500 characters)
    #[serde(default)]
    pub note: String,
    /// Symbolic icon reference for rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Context tags, order-preserving
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifestyle: Option<LifestyleStats>,
    /// Email of the user who logged the entry (association only, not enforced)
    #[serde(
        rename = "userEmail",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_email: Option<String>,
}

/// Why a new mood entry was rejected before it reached the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntryRejection {
    MissingDate,
    MissingMood,
    NoteTooLong(usize),
}

impl fmt::Display for EntryRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryRejection::MissingDate => write!(f, "entry is missing a date"),
            EntryRejection::MissingMood => write!(f, "entry is missing a mood label"),
            EntryRejection::NoteTooLong(len) => {
                write!(f, "note is {} characters (max {})", len, NOTE_MAX_LEN)
            }
        }
    }
}

impl MoodEntry {
    /// Check the fields a store requires before accepting a new entry
    pub fn validate_new(&self) -> Result<(), EntryRejection> {
        if self.date.trim().is_empty() {
            return Err(EntryRejection::MissingDate);
        }
        if self.mood.trim().is_empty() {
            return Err(EntryRejection::MissingMood);
        }
        let note_len = self.note.chars().count();
        if note_len > NOTE_MAX_LEN {
            return Err(EntryRejection::NoteTooLong(note_len));
        }
        Ok(())
    }
}

/// Body of POST /api/auth/login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub email: String,
}

/// Whether the insight heuristics treat a mood label as negative
pub fn is_negative_mood(label: &str) -> bool {
    NEGATIVE_MOODS.contains(&label)
}

/// Icon class for a preset mood label, falling back for custom labels
pub fn icon_for_mood(label: &str) -> &'static str {
    match label {
        "Happy" => "fa-face-smile-beam",
        "Sad" => "fa-face-frown-open",
        "Stressed" => "fa-face-grimace",
        "Tired" => "fa-face-tired",
        "Neutral" => "fa-face-meh",
        _ => "fa-face-meh",
    }
}

/// Icon class for a context tag
///
/// Unknown tags are tolerated and get a generic icon rather than an error.
pub fn icon_for_tag(tag: &str) -> &'static str {
    match tag {
        "#Work" => "fa-briefcase",
        "#Sleep" => "fa-moon",
        "#Social" => "fa-users",
        "#Health" => "fa-heart-pulse",
        "#Family" => "fa-house-chimney-user",
        _ => "fa-tag",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> MoodEntry {
        MoodEntry {
            id: None,
            date: "2025-06-12T19:08:42-04:00".to_string(),
            mood: "Happy".to_string(),
            note: "Walked in the park".to_string(),
            icon: Some("fa-face-smile-beam".to_string()),
            tags: vec!["#Health".to_string()],
            lifestyle: Some(LifestyleStats {
                sleep_hours: 7.5,
                water_ounces: 48.0,
                mindful_minutes: 10.0,
                steps: 6200.0,
            }),
            user_email: Some("jane.doe@example.com".to_string()),
        }
    }

    #[test]
    fn lifestyle_serializes_camel_case() {
        let entry = sample_entry();
        let json = serde_json::to_value(&entry).expect("serialize entry");

        assert_eq!(json["lifestyle"]["sleepHours"], 7.5);
        assert_eq!(json["lifestyle"]["waterOunces"], 48.0);
        assert_eq!(json["userEmail"], "jane.doe@example.com");
    }

    #[test]
    fn optional_fields_absent_from_wire() {
        let mut entry = sample_entry();
        entry.icon = None;
        entry.lifestyle = None;
        entry.user_email = None;

        let json = serde_json::to_value(&entry).expect("serialize entry");
        let object = json.as_object().expect("entry is an object");

        assert!(!object.contains_key("icon"));
        assert!(!object.contains_key("lifestyle"));
        assert!(!object.contains_key("userEmail"));
    }

    #[test]
    fn entry_without_optionals_deserializes() {
        let json = r#"{"date":"2025-06-12T19:08:42-04:00","mood":"Calm"}"#;
        let entry: MoodEntry = serde_json::from_str(json).expect("deserialize entry");

        assert_eq!(entry.mood, "Calm");
        assert_eq!(entry.note, "");
        assert!(entry.tags.is_empty());
        assert!(entry.lifestyle.is_none());
    }

    #[test]
    fn validate_new_requires_date_and_mood() {
        let mut entry = sample_entry();
        entry.date = "  ".to_string();
        assert_eq!(entry.validate_new(), Err(EntryRejection::MissingDate));

        let mut entry = sample_entry();
        entry.mood = String::new();
        assert_eq!(entry.validate_new(), Err(EntryRejection::MissingMood));

        assert_eq!(sample_entry().validate_new(), Ok(()));
    }

    #[test]
    fn validate_new_caps_note_length() {
        let mut entry = sample_entry();
        entry.note = "x".repeat(NOTE_MAX_LEN + 1);

        assert_eq!(
            entry.validate_new(),
            Err(EntryRejection::NoteTooLong(NOTE_MAX_LEN + 1))
        );
    }

    #[test]
    fn unknown_tags_and_moods_fall_back() {
        assert_eq!(icon_for_tag("#Gardening"), "fa-tag");
        assert_eq!(icon_for_mood("Triumphant"), "fa-face-meh");
        assert!(is_negative_mood("Stressed"));
        assert!(!is_negative_mood("Triumphant"));
    }
}
