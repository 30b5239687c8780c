//! Typed records on top of the key-value adapter.
//!
//! An absent key and a value that no longer parses are treated the same
//! way: the record's default is returned. Malformed values are logged, never
//! surfaced to the caller.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Database;
use crate::error::DatabaseError;

/// Names of the persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKey {
    ActiveTasks,
    CompletedTasks,
    Stats,
    Goals,
    Theme,
    Onboarded,
    WelcomeShown,
    Notes,
    Timer,
}

impl RecordKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKey::ActiveTasks => "focusquest_tasks",
            RecordKey::CompletedTasks => "focusquest_completed_tasks",
            RecordKey::Stats => "focusquest_stats",
            RecordKey::Goals => "focusquest_goals",
            RecordKey::Theme => "focusquest_theme",
            RecordKey::Onboarded => "focusquest_onboarded",
            RecordKey::WelcomeShown => "focusquest_welcome_shown",
            RecordKey::Notes => "focusquest_notes",
            RecordKey::Timer => "focusquest_timer",
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Database {
    /// Load a JSON record, falling back to `T::default()` when the key is
    /// absent, unreadable or malformed.
    pub fn load_record<T>(&self, key: RecordKey) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.try_load_record(key).unwrap_or_default()
    }

    /// Like [`Database::load_record`] but distinguishes "nothing usable"
    /// (`None`) from a stored value.
    pub fn try_load_record<T>(&self, key: RecordKey) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let raw = match self.kv_get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(%key, error = %e, "failed to read record, using default");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%key, error = %e, "malformed record, using default");
                None
            }
        }
    }

    /// Serialize and store a full snapshot of a record.
    pub fn save_record<T>(&self, key: RecordKey, value: &T) -> Result<(), DatabaseError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value).map_err(|e| DatabaseError::EncodeFailed {
            key: key.as_str().to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(key.as_str(), &json)
    }

    fn load_flag(&self, key: RecordKey) -> bool {
        matches!(self.kv_get(key.as_str()), Ok(Some(v)) if v == "true")
    }

    fn load_text(&self, key: RecordKey) -> Option<String> {
        match self.kv_get(key.as_str()) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(%key, error = %e, "failed to read record, using default");
                None
            }
        }
    }
}

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Neon,
    Contrast,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Neon => "neon",
            Theme::Contrast => "contrast",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "neon" => Ok(Theme::Neon),
            "contrast" => Ok(Theme::Contrast),
            other => Err(format!("unknown theme: {other} (expected light, neon or contrast)")),
        }
    }
}

/// Small single-value records: theme, onboarding flags and notes.
///
/// Stored as plain strings rather than JSON.
pub struct Preferences<'db> {
    db: &'db Database,
}

impl<'db> Preferences<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    pub fn theme(&self) -> Theme {
        self.db
            .load_text(RecordKey::Theme)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), DatabaseError> {
        self.db.kv_set(RecordKey::Theme.as_str(), theme.as_str())
    }

    pub fn is_onboarded(&self) -> bool {
        self.db.load_flag(RecordKey::Onboarded)
    }

    pub fn set_onboarded(&self) -> Result<(), DatabaseError> {
        self.db.kv_set(RecordKey::Onboarded.as_str(), "true")
    }

    pub fn is_welcome_shown(&self) -> bool {
        self.db.load_flag(RecordKey::WelcomeShown)
    }

    pub fn set_welcome_shown(&self) -> Result<(), DatabaseError> {
        self.db.kv_set(RecordKey::WelcomeShown.as_str(), "true")
    }

    /// Whether the one-time welcome screen is still due.
    pub fn should_show_welcome(&self) -> bool {
        self.is_onboarded() && !self.is_welcome_shown()
    }

    pub fn notes(&self) -> String {
        self.db.load_text(RecordKey::Notes).unwrap_or_default()
    }

    pub fn set_notes(&self, notes: &str) -> Result<(), DatabaseError> {
        self.db.kv_set(RecordKey::Notes.as_str(), notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_record_yields_default() {
        let db = Database::open_memory().unwrap();
        let tasks: Vec<String> = db.load_record(RecordKey::ActiveTasks);
        assert!(tasks.is_empty());
        assert!(db.try_load_record::<Vec<String>>(RecordKey::ActiveTasks).is_none());
    }

    #[test]
    fn malformed_record_yields_default() {
        let db = Database::open_memory().unwrap();
        db.kv_set(RecordKey::Goals.as_str(), "{not json").unwrap();
        let goals: Vec<String> = db.load_record(RecordKey::Goals);
        assert!(goals.is_empty());
    }

    #[test]
    fn saved_record_loads_back() {
        let db = Database::open_memory().unwrap();
        db.save_record(RecordKey::Goals, &vec!["a".to_string(), "b".to_string()])
            .unwrap();
        let goals: Vec<String> = db.load_record(RecordKey::Goals);
        assert_eq!(goals, vec!["a", "b"]);
    }

    #[test]
    fn preferences_defaults() {
        let db = Database::open_memory().unwrap();
        let prefs = Preferences::new(&db);
        assert_eq!(prefs.theme(), Theme::Light);
        assert!(!prefs.is_onboarded());
        assert!(!prefs.is_welcome_shown());
        assert!(!prefs.should_show_welcome());
        assert_eq!(prefs.notes(), "");
    }

    #[test]
    fn welcome_is_due_only_between_onboarding_and_first_show() {
        let db = Database::open_memory().unwrap();
        let prefs = Preferences::new(&db);
        prefs.set_onboarded().unwrap();
        assert!(prefs.should_show_welcome());
        prefs.set_welcome_shown().unwrap();
        assert!(!prefs.should_show_welcome());
    }

    #[test]
    fn unknown_theme_falls_back_to_light() {
        let db = Database::open_memory().unwrap();
        db.kv_set(RecordKey::Theme.as_str(), "sepia").unwrap();
        assert_eq!(Preferences::new(&db).theme(), Theme::Light);

        Preferences::new(&db).set_theme(Theme::Neon).unwrap();
        assert_eq!(Preferences::new(&db).theme(), Theme::Neon);
    }

    #[test]
    fn keys_match_browser_storage_names() {
        assert_eq!(RecordKey::ActiveTasks.as_str(), "focusquest_tasks");
        assert_eq!(RecordKey::CompletedTasks.as_str(), "focusquest_completed_tasks");
        assert_eq!(RecordKey::WelcomeShown.to_string(), "focusquest_welcome_shown");
    }
}
