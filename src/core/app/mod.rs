//! Interaction controller for the chat screen.
//!
//! [`App`] is the single owner of conversation history, request progress and
//! cited sources. All mutations go through [`apply_action`], which returns the
//! side effects ([`AppCommand`]) the event loop must perform.

use crate::core::config::ClientConfig;
use crate::core::message::AppMessageKind;
use crate::core::preferences::Preferences;
use crate::core::profile::PROFILE;
use crate::ui::theme::Theme;

pub mod actions;
pub mod session;
pub mod ui_state;

#[cfg(test)]
mod tests;

pub use actions::{apply_action, apply_actions, AppAction, AppCommand};
pub use session::SessionContext;
pub use ui_state::{ChatState, Overlay, UiState};

pub struct App {
    pub session: SessionContext,
    pub ui: UiState,
    pub preferences: Preferences,
}

impl App {
    pub fn new(config: &ClientConfig, preferences: Preferences, first_run: bool) -> Self {
        let mut app = Self {
            session: SessionContext::new(config),
            ui: UiState::new(Theme::dark_default()),
            preferences,
        };

        if first_run {
            app.ui
                .add_app_message(AppMessageKind::Info, PROFILE.welcome_message());
        }
        if app.preferences.email_prompt_enabled {
            app.ui.overlay = Some(Overlay::Onboarding);
        }
        app
    }

    pub fn state(&self) -> ChatState {
        self.ui.state
    }

    pub fn is_current_stream(&self, stream_id: u64) -> bool {
        self.session.is_current_stream(stream_id)
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.ui.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.ui.status = None;
    }
}
