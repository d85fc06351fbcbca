use chrono::Utc;
use tracing::info;

use super::{App, AppAction, AppCommand};
use crate::core::app::ui_state::Overlay;

pub(super) fn handle_overlay_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::FeedbackRate { rating } => {
            if app.ui.overlay != Some(Overlay::Feedback) || !(1..=3).contains(&rating) {
                return None;
            }
            app.preferences.record_feedback(rating, Utc::now());
            info!(rating, "feedback recorded");
            app.ui.overlay = None;
            app.set_status("Thanks for the feedback!");
            Some(persist(app))
        }
        AppAction::FeedbackDismiss => {
            close_if_open(app, Overlay::Feedback);
            None
        }
        AppAction::FeedbackDisable => {
            if !close_if_open(app, Overlay::Feedback) {
                return None;
            }
            app.preferences.feedback_prompt_enabled = false;
            app.set_status("Feedback prompts turned off");
            Some(persist(app))
        }
        AppAction::OnboardingDismiss => {
            close_if_open(app, Overlay::Onboarding);
            None
        }
        AppAction::OnboardingDisable => {
            if !close_if_open(app, Overlay::Onboarding) {
                return None;
            }
            app.preferences.email_prompt_enabled = false;
            Some(persist(app))
        }
        _ => unreachable!("non-overlay action routed to overlay handler"),
    }
}

fn close_if_open(app: &mut App, overlay: Overlay) -> bool {
    if app.ui.overlay == Some(overlay) {
        app.ui.overlay = None;
        true
    } else {
        false
    }
}

fn persist(app: &App) -> AppCommand {
    AppCommand::PersistPreferences(app.preferences.clone())
}
