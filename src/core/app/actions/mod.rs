mod input;
mod overlay;
mod streaming;
mod suggestions;

use tui_textarea::Input;

use super::App;
use crate::core::chat_stream::{StreamEvent, StreamParams};
use crate::core::preferences::Preferences;

pub enum AppAction {
    EditInput {
        input: Input,
    },
    SubmitInput,
    SubmitMessage {
        message: String,
    },
    CancelStreaming,
    StreamEvent {
        event: StreamEvent,
        stream_id: u64,
    },
    StreamWarning {
        message: String,
        stream_id: u64,
    },
    SuggestionMoveUp,
    SuggestionMoveDown,
    SuggestionAccept,
    SuggestionDismiss,
    FeedbackRate {
        rating: u8,
    },
    FeedbackDismiss,
    FeedbackDisable,
    OnboardingDismiss,
    OnboardingDisable,
    Tick,
    Quit,
}

pub enum AppCommand {
    SpawnStream(StreamParams),
    PersistPreferences(Preferences),
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::StreamEvent { .. }
        | AppAction::StreamWarning { .. }
        | AppAction::CancelStreaming
        | AppAction::SubmitMessage { .. } => streaming::handle_streaming_action(app, action),

        AppAction::EditInput { .. } | AppAction::SubmitInput | AppAction::Tick | AppAction::Quit => {
            input::handle_input_action(app, action)
        }

        AppAction::SuggestionMoveUp
        | AppAction::SuggestionMoveDown
        | AppAction::SuggestionAccept
        | AppAction::SuggestionDismiss => suggestions::handle_suggestion_action(app, action),

        AppAction::FeedbackRate { .. }
        | AppAction::FeedbackDismiss
        | AppAction::FeedbackDisable
        | AppAction::OnboardingDismiss
        | AppAction::OnboardingDisable => overlay::handle_overlay_action(app, action),
    }
}
