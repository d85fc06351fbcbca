#[cfg(test)]
use std::cell::RefCell;

#[cfg(test)]
use crate::core::app::App;
#[cfg(test)]
use crate::core::config::ClientConfig;
#[cfg(test)]
use crate::core::message::{ProgressItem, ProgressStatus, Source, SourceMetadata};
#[cfg(test)]
use crate::core::preferences::{PreferenceStore, Preferences};

/// App with onboarding switched off and no welcome message, so tests start
/// from an empty transcript with no overlay.
#[cfg(test)]
pub fn create_test_app() -> App {
    create_test_app_with_preferences(Preferences {
        email_prompt_enabled: false,
        ..Preferences::default()
    })
}

#[cfg(test)]
pub fn create_test_app_with_preferences(preferences: Preferences) -> App {
    let config = ClientConfig {
        base_url: "https://api.test.com/api".to_string(),
        ..ClientConfig::default()
    };
    App::new(&config, preferences, false)
}

#[cfg(test)]
pub fn progress_item(id: &str, status: ProgressStatus) -> ProgressItem {
    ProgressItem {
        id: id.to_string(),
        label: format!("Step {id}"),
        detail: None,
        status,
    }
}

#[cfg(test)]
pub fn create_test_source(id: &str, title: &str) -> Source {
    Source {
        id: id.to_string(),
        metadata: SourceMetadata {
            title: title.to_string(),
            kind: "project".to_string(),
        },
    }
}

/// In-memory stand-in for the preference file.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryPreferenceStore {
    pub stored: RefCell<Option<Preferences>>,
    pub saves: RefCell<usize>,
}

#[cfg(test)]
impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Preferences {
        self.stored.borrow().clone().unwrap_or_default()
    }

    fn save(&self, preferences: &Preferences) {
        *self.stored.borrow_mut() = Some(preferences.clone());
        *self.saves.borrow_mut() += 1;
    }
}
