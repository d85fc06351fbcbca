use tui_textarea::TextArea;

use crate::core::message::{AppMessageKind, ConversationTurn, ProgressItem, Source};
use crate::ui::theme::Theme;

/// Where the conversation is in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// Nothing in flight; the input accepts a new message.
    Idle,

    /// A request was sent and nothing visible has come back yet.
    AwaitingResponse,

    /// Progress, sources or text are arriving for the current request.
    Responding,

    /// The last answer offered follow-up questions and one is highlighted.
    SuggestionFocus {
        /// Index of the highlighted suggestion.
        selected: usize,
    },
}

impl ChatState {
    pub fn is_in_flight(self) -> bool {
        matches!(self, ChatState::AwaitingResponse | ChatState::Responding)
    }
}

/// Prompts drawn over the conversation. They capture the keyboard while open
/// but never change the underlying [`ChatState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Onboarding,
    Feedback,
}

pub struct UiState {
    pub state: ChatState,
    pub overlay: Option<Overlay>,
    pub turns: Vec<ConversationTurn>,
    pub progress: Vec<ProgressItem>,
    pub sources: Vec<Source>,
    pub partial_response: String,
    pub pending_suggestions: Vec<String>,
    pub suggestions: Vec<String>,
    pub status: Option<String>,
    pub spinner_frame: usize,
    pub exit_requested: bool,
    pub theme: Theme,
    textarea: TextArea<'static>,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        let mut ui = Self {
            state: ChatState::Idle,
            overlay: None,
            turns: Vec::new(),
            progress: Vec::new(),
            sources: Vec::new(),
            partial_response: String::new(),
            pending_suggestions: Vec::new(),
            suggestions: Vec::new(),
            status: None,
            spinner_frame: 0,
            exit_requested: false,
            theme,
            textarea: TextArea::default(),
        };
        ui.configure_textarea();
        ui
    }

    pub(crate) fn configure_textarea(&mut self) {
        let textarea_style = self
            .theme
            .input_text_style
            .patch(ratatui::style::Style::default().bg(self.theme.background_color));
        self.textarea.set_style(textarea_style);
        self.textarea
            .set_cursor_style(self.theme.input_cursor_style);
        self.textarea
            .set_cursor_line_style(self.theme.input_cursor_line_style);
        self.textarea
            .set_placeholder_text("Ask me anything (Enter to send, Ctrl+C to quit)");
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn apply_textarea_edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextArea<'static>),
    {
        f(&mut self.textarea);
    }

    pub fn get_input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn clear_input(&mut self) {
        self.textarea = TextArea::default();
        self.configure_textarea();
    }

    #[cfg(test)]
    pub fn set_input_text(&mut self, text: &str) {
        self.textarea = TextArea::from(text.split('\n').map(str::to_string));
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
        self.configure_textarea();
    }

    pub fn add_app_message(&mut self, kind: AppMessageKind, content: impl Into<String>) {
        self.turns.push(ConversationTurn::app(kind, content));
    }

    /// Drops everything scoped to the request in flight.
    pub fn reset_request_state(&mut self) {
        self.progress.clear();
        self.sources.clear();
        self.partial_response.clear();
        self.pending_suggestions.clear();
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.is_in_flight()
    }

    pub fn selected_suggestion(&self) -> Option<&str> {
        match self.state {
            ChatState::SuggestionFocus { selected } => {
                self.suggestions.get(selected).map(String::as_str)
            }
            _ => None,
        }
    }

    pub fn input_title(&self) -> &'static str {
        match (self.overlay, self.state) {
            (Some(Overlay::Feedback), _) => "Rate this chat: 1-3, Esc to skip, x to stop asking",
            (Some(Overlay::Onboarding), _) => "Enter to continue, n to hide this next time",
            (None, ChatState::AwaitingResponse | ChatState::Responding) => {
                "Waiting for the answer (Esc to cancel, Ctrl+C to quit)"
            }
            (None, ChatState::SuggestionFocus { .. }) => {
                "↑/↓ pick a follow-up, Enter to ask it, Esc to dismiss, or keep typing"
            }
            (None, ChatState::Idle) => "Ask a question (Enter to send, Ctrl+C to quit)",
        }
    }
}
