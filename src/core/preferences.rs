//! Per-user preferences that survive restarts.
//!
//! Loading never fails outward: a missing, unreadable or malformed file yields
//! [`Preferences::default`], which enables every prompt. Saving is best effort;
//! a failed write only affects future sessions.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

const PREFERENCES_FILE: &str = "preferences.toml";
const FIRST_RUN_MARKER: &str = ".first-run-complete";

fn enabled() -> bool {
    true
}

/// A rating given through the feedback prompt. Kept on this machine only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub rating: u8,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Show the onboarding prompt with the contact address at startup.
    #[serde(default = "enabled")]
    pub email_prompt_enabled: bool,
    /// Offer the feedback prompt after a few answers.
    #[serde(default = "enabled")]
    pub feedback_prompt_enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<FeedbackRecord>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            email_prompt_enabled: true,
            feedback_prompt_enabled: true,
            feedback: Vec::new(),
        }
    }
}

/// Errors that can occur while reading or writing the preferences file.
#[derive(Debug)]
pub enum PreferenceError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Serialize(toml::ser::Error),
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceError::Read { path, source } => {
                write!(f, "Failed to read preferences at {}: {}", path.display(), source)
            }
            PreferenceError::Parse { path, source } => {
                write!(f, "Failed to parse preferences at {}: {}", path.display(), source)
            }
            PreferenceError::Serialize(source) => {
                write!(f, "Failed to serialize preferences: {source}")
            }
            PreferenceError::Write { path, source } => {
                write!(f, "Failed to write preferences at {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for PreferenceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            PreferenceError::Read { source, .. } | PreferenceError::Write { source, .. } => {
                Some(source)
            }
            PreferenceError::Parse { source, .. } => Some(source),
            PreferenceError::Serialize(source) => Some(source),
        }
    }
}

impl Preferences {
    pub fn load_from_path(path: &Path) -> Result<Preferences, PreferenceError> {
        if !path.exists() {
            return Ok(Preferences::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| PreferenceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| PreferenceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), PreferenceError> {
        let write_err = |source| PreferenceError::Write {
            path: path.to_path_buf(),
            source,
        };
        let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = parent {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let contents = toml::to_string_pretty(self).map_err(PreferenceError::Serialize)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(write_err)?;

        temp_file.write_all(contents.as_bytes()).map_err(write_err)?;
        temp_file.as_file_mut().sync_all().map_err(write_err)?;
        temp_file
            .persist(path)
            .map_err(|err| write_err(err.error))?;
        Ok(())
    }

    pub fn record_feedback(&mut self, rating: u8, recorded_at: DateTime<Utc>) {
        self.feedback.push(FeedbackRecord {
            rating,
            recorded_at,
        });
    }
}

/// Storage seam for preferences so the controller can be exercised without
/// touching the filesystem.
pub trait PreferenceStore {
    fn load(&self) -> Preferences;
    fn save(&self, preferences: &Preferences);
}

/// Per-user configuration directory, if the platform defines one.
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "cardterm", "cardterm").map(|dirs| dirs.config_dir().to_path_buf())
}

#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: Option<PathBuf>,
}

impl FilePreferenceStore {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            path: dir.map(|dir| dir.join(PREFERENCES_FILE)),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Preferences {
        let Some(path) = self.path.as_deref() else {
            return Preferences::default();
        };
        Preferences::load_from_path(path).unwrap_or_else(|err| {
            debug!(error = %err, "using default preferences");
            Preferences::default()
        })
    }

    fn save(&self, preferences: &Preferences) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        if let Err(err) = preferences.save_to_path(path) {
            debug!(error = %err, "preferences not saved");
        }
    }
}

/// Flag file recording that the welcome message has been shown.
#[derive(Debug, Clone)]
pub struct FirstRunMarker {
    path: Option<PathBuf>,
}

impl FirstRunMarker {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            path: dir.map(|dir| dir.join(FIRST_RUN_MARKER)),
        }
    }

    /// Without a config directory every run counts as a repeat run, so the
    /// welcome message is never shown on each start.
    pub fn is_first_run(&self) -> bool {
        self.path.as_deref().is_some_and(|path| !path.exists())
    }

    pub fn mark_complete(&self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        let result = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::write(path, Utc::now().to_rfc3339()));
        if let Err(err) = result {
            debug!(error = %err, path = %path.display(), "first-run marker not written");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().expect("temp dir");
        let store = FilePreferenceStore::new(Some(temp_dir.path().to_path_buf()));
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let temp_dir = TempDir::new().expect("temp dir");
        let store = FilePreferenceStore::new(Some(temp_dir.path().to_path_buf()));
        fs::write(store.path().expect("path"), "email_prompt_enabled = \"maybe\"\n[[[")
            .expect("write");

        let prefs = store.load();
        assert!(prefs.email_prompt_enabled);
        assert!(prefs.feedback_prompt_enabled);
    }

    #[test]
    fn unreadable_path_yields_defaults() {
        let temp_dir = TempDir::new().expect("temp dir");
        // A directory where the file should be cannot be read as text.
        fs::create_dir(temp_dir.path().join(PREFERENCES_FILE)).expect("mkdir");
        let store = FilePreferenceStore::new(Some(temp_dir.path().to_path_buf()));
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join(PREFERENCES_FILE);
        fs::write(&path, "email_prompt_enabled = false\n").expect("write");

        let prefs = Preferences::load_from_path(&path).expect("load");
        assert!(!prefs.email_prompt_enabled);
        assert!(prefs.feedback_prompt_enabled);
        assert!(prefs.feedback.is_empty());
    }

    #[test]
    fn saved_preferences_survive_reload() {
        let temp_dir = TempDir::new().expect("temp dir");
        let store = FilePreferenceStore::new(Some(temp_dir.path().join("nested")));

        let mut prefs = Preferences {
            feedback_prompt_enabled: false,
            ..Preferences::default()
        };
        let when = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        prefs.record_feedback(3, when);
        store.save(&prefs);

        assert_eq!(store.load(), prefs);
    }

    #[test]
    fn save_failures_are_swallowed() {
        let temp_dir = TempDir::new().expect("temp dir");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").expect("write");
        let store = FilePreferenceStore::new(Some(blocker.join("sub")));

        store.save(&Preferences::default());
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn store_without_directory_is_inert() {
        let store = FilePreferenceStore::new(None);
        store.save(&Preferences {
            email_prompt_enabled: false,
            ..Preferences::default()
        });
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn first_run_marker_round_trip() {
        let temp_dir = TempDir::new().expect("temp dir");
        let marker = FirstRunMarker::new(Some(temp_dir.path().join("cfg")));
        assert!(marker.is_first_run());
        marker.mark_complete();
        assert!(!marker.is_first_run());

        assert!(!FirstRunMarker::new(None).is_first_run());
    }
}
