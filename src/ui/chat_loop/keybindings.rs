//! Maps terminal key presses to controller actions.
//!
//! Resolution order: global quit, the open overlay (which captures every
//! other key), then the current [`ChatState`].

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tui_textarea::Input as TAInput;

use crate::core::app::{App, AppAction, ChatState, Overlay};

pub fn actions_for_key(app: &App, key: KeyEvent) -> Vec<AppAction> {
    if key.kind == KeyEventKind::Release {
        return Vec::new();
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return vec![AppAction::Quit];
    }

    if let Some(overlay) = app.ui.overlay {
        return overlay_action(overlay, key).into_iter().collect();
    }

    if ctrl && key.code == KeyCode::Char('d') && app.ui.get_input_text().is_empty() {
        return vec![AppAction::Quit];
    }

    let action = match app.ui.state {
        ChatState::AwaitingResponse | ChatState::Responding => match key.code {
            KeyCode::Esc => AppAction::CancelStreaming,
            KeyCode::Enter if !wants_newline(&key) => AppAction::SubmitInput,
            _ => edit(key),
        },
        ChatState::SuggestionFocus { .. } => match key.code {
            KeyCode::Up => AppAction::SuggestionMoveUp,
            KeyCode::Down => AppAction::SuggestionMoveDown,
            KeyCode::Enter if !wants_newline(&key) => AppAction::SuggestionAccept,
            KeyCode::Esc => AppAction::SuggestionDismiss,
            _ => edit(key),
        },
        ChatState::Idle => match key.code {
            KeyCode::Enter if !wants_newline(&key) => AppAction::SubmitInput,
            KeyCode::Esc => return Vec::new(),
            _ => edit(key),
        },
    };
    vec![action]
}

fn overlay_action(overlay: Overlay, key: KeyEvent) -> Option<AppAction> {
    match overlay {
        Overlay::Feedback => match key.code {
            KeyCode::Char(c @ '1'..='3') => Some(AppAction::FeedbackRate {
                rating: c as u8 - b'0',
            }),
            KeyCode::Esc | KeyCode::Char('d') => Some(AppAction::FeedbackDismiss),
            KeyCode::Char('x') => Some(AppAction::FeedbackDisable),
            _ => None,
        },
        Overlay::Onboarding => match key.code {
            KeyCode::Enter | KeyCode::Esc => Some(AppAction::OnboardingDismiss),
            KeyCode::Char('n') => Some(AppAction::OnboardingDisable),
            _ => None,
        },
    }
}

/// Alt+Enter and Shift+Enter insert a line break instead of sending.
fn wants_newline(key: &KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT)
}

fn edit(key: KeyEvent) -> AppAction {
    AppAction::EditInput {
        input: TAInput::from(key),
    }
}
