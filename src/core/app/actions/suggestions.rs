use super::{streaming, App, AppAction, AppCommand};
use crate::core::app::ui_state::ChatState;

pub(super) fn handle_suggestion_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    let ChatState::SuggestionFocus { selected } = app.ui.state else {
        return None;
    };
    let len = app.ui.suggestions.len();

    match action {
        AppAction::SuggestionMoveUp => {
            app.ui.state = ChatState::SuggestionFocus {
                selected: clamp_previous_index(selected, len),
            };
            None
        }
        AppAction::SuggestionMoveDown => {
            app.ui.state = ChatState::SuggestionFocus {
                selected: clamp_next_index(selected, len),
            };
            None
        }
        AppAction::SuggestionAccept => {
            let question = app.ui.selected_suggestion()?.to_string();
            dismiss_suggestions(app);
            let submission = streaming::submit_message(app, question);
            if submission.accepted {
                app.ui.clear_input();
            }
            submission.command
        }
        AppAction::SuggestionDismiss => {
            dismiss_suggestions(app);
            None
        }
        _ => unreachable!("non-suggestion action routed to suggestion handler"),
    }
}

pub(super) fn dismiss_suggestions(app: &mut App) {
    app.ui.suggestions.clear();
    if matches!(app.ui.state, ChatState::SuggestionFocus { .. }) {
        app.ui.state = ChatState::Idle;
    }
}

/// Moves one step down, stopping at the last entry.
pub(crate) fn clamp_next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        current.saturating_add(1).min(len - 1)
    }
}

/// Moves one step up, stopping at the first entry.
pub(crate) fn clamp_previous_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        current.min(len - 1).saturating_sub(1)
    }
}
