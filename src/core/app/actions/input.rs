use tui_textarea::{Input, Key};

use super::{streaming, suggestions, App, AppAction, AppCommand};
use crate::core::app::ui_state::ChatState;

pub(super) fn handle_input_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::EditInput { input } => {
            edit_input(app, input);
            None
        }
        AppAction::SubmitInput => {
            let text = app.ui.get_input_text();
            let submission = streaming::submit_message(app, text);
            if submission.accepted {
                app.ui.clear_input();
            }
            submission.command
        }
        AppAction::Tick => {
            if app.ui.is_in_flight() {
                app.ui.spinner_frame = app.ui.spinner_frame.wrapping_add(1);
            }
            None
        }
        AppAction::Quit => {
            app.session.cancel_current_stream();
            app.ui.exit_requested = true;
            None
        }
        _ => unreachable!("non-input action routed to input handler"),
    }
}

fn edit_input(app: &mut App, input: Input) {
    if matches!(app.ui.state, ChatState::SuggestionFocus { .. }) && is_printable(&input) {
        suggestions::dismiss_suggestions(app);
    }
    app.ui.apply_textarea_edit(|textarea| {
        textarea.input(input);
    });
}

fn is_printable(input: &Input) -> bool {
    matches!(input.key, Key::Char(c) if !c.is_control()) && !input.ctrl && !input.alt
}
