use tracing::debug;

use super::{App, AppAction, AppCommand};
use crate::core::app::ui_state::{ChatState, Overlay};
use crate::core::chat_stream::StreamEvent;
use crate::core::constants::FEEDBACK_PROMPT_AFTER_TURNS;
use crate::core::message::{AppMessageKind, ConversationTurn, ProgressItem, ProgressStatus};
use crate::core::validation::ChatRequest;

pub(super) fn handle_streaming_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::StreamEvent { event, stream_id } => {
            if !app.is_current_stream(stream_id) {
                debug!(stream_id, "ignoring event from stale stream");
                return None;
            }
            handle_stream_event(app, event)
        }
        AppAction::StreamWarning { message, stream_id } => {
            if !app.is_current_stream(stream_id) {
                return None;
            }
            let trimmed = message.trim();
            if !trimmed.is_empty() {
                app.ui.add_app_message(AppMessageKind::Warning, trimmed);
            }
            None
        }
        AppAction::CancelStreaming => {
            cancel_current_request(app);
            None
        }
        AppAction::SubmitMessage { message } => submit_message(app, message).command,
        _ => unreachable!("non-streaming action routed to streaming handler"),
    }
}

/// Result of a submission attempt; `accepted` tells the caller whether the
/// input box may be cleared.
pub(super) struct Submission {
    pub accepted: bool,
    pub command: Option<AppCommand>,
}

impl Submission {
    fn rejected() -> Self {
        Self {
            accepted: false,
            command: None,
        }
    }
}

pub(super) fn submit_message(app: &mut App, message: String) -> Submission {
    if app.ui.is_in_flight() {
        app.set_status("An answer is still on its way. Press Esc to cancel it.");
        return Submission::rejected();
    }

    let request = ChatRequest::new(message);
    if let Err(err) = request.validate() {
        if request.message.trim().is_empty() {
            return Submission::rejected();
        }
        app.ui
            .add_app_message(AppMessageKind::Error, err.display_lines());
        return Submission::rejected();
    }

    let message = request.message.trim().to_string();
    app.clear_status();
    app.ui.suggestions.clear();
    app.ui.reset_request_state();
    app.ui.turns.push(ConversationTurn::user(message.clone()));
    app.ui.state = ChatState::AwaitingResponse;

    let (cancel_token, stream_id) = app.session.start_new_stream();
    debug!(stream_id, "submitting message");
    Submission {
        accepted: true,
        command: Some(AppCommand::SpawnStream(app.session.build_stream_params(
            message,
            cancel_token,
            stream_id,
        ))),
    }
}

fn handle_stream_event(app: &mut App, event: StreamEvent) -> Option<AppCommand> {
    match event {
        StreamEvent::Progress { items } => {
            let started = items
                .iter()
                .any(|item| item.status == ProgressStatus::InProgress);
            merge_progress(&mut app.ui.progress, items);
            if started {
                mark_responding(app);
            }
            None
        }
        StreamEvent::Sources { sources } => {
            app.ui.sources.extend(sources);
            mark_responding(app);
            None
        }
        StreamEvent::Partial { text } => {
            app.ui.partial_response.push_str(&text);
            mark_responding(app);
            None
        }
        StreamEvent::Suggestions { questions } => {
            app.ui.pending_suggestions = questions
                .into_iter()
                .map(|question| question.trim().to_string())
                .filter(|question| !question.is_empty())
                .collect();
            None
        }
        StreamEvent::Final { text } => finalize_stream(app, text),
        StreamEvent::Error { message } => {
            handle_stream_error(app, message);
            None
        }
    }
}

fn mark_responding(app: &mut App) {
    if app.ui.state == ChatState::AwaitingResponse {
        app.ui.state = ChatState::Responding;
    }
}

/// Updates items with a known id in place and appends new ones, keeping the
/// order in which ids were first seen.
fn merge_progress(progress: &mut Vec<ProgressItem>, items: Vec<ProgressItem>) {
    for item in items {
        match progress.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => progress.push(item),
        }
    }
}

fn finalize_stream(app: &mut App, text: String) -> Option<AppCommand> {
    let partial = std::mem::take(&mut app.ui.partial_response);
    let content = if text.trim().is_empty() { partial } else { text };
    let sources = std::mem::take(&mut app.ui.sources);
    let suggestions = std::mem::take(&mut app.ui.pending_suggestions);

    app.ui.turns.push(ConversationTurn::assistant(
        content,
        sources,
        suggestions.clone(),
    ));
    app.ui.reset_request_state();
    app.session.end_stream();

    app.ui.state = if suggestions.is_empty() {
        ChatState::Idle
    } else {
        ChatState::SuggestionFocus { selected: 0 }
    };
    app.ui.suggestions = suggestions;

    app.session.completed_turns += 1;
    maybe_offer_feedback(app);
    None
}

fn maybe_offer_feedback(app: &mut App) {
    if app.session.feedback_offered
        || !app.preferences.feedback_prompt_enabled
        || app.ui.overlay.is_some()
        || app.session.completed_turns < FEEDBACK_PROMPT_AFTER_TURNS
    {
        return;
    }
    app.session.feedback_offered = true;
    app.ui.overlay = Some(Overlay::Feedback);
}

fn handle_stream_error(app: &mut App, message: String) {
    let error_message = message.trim();
    let error_message = if error_message.is_empty() {
        "The chat service reported an error."
    } else {
        error_message
    };
    debug!(error = error_message, "chat stream failed");

    app.ui.add_app_message(AppMessageKind::Error, error_message);
    app.ui.reset_request_state();
    app.ui.suggestions.clear();
    app.session.end_stream();
    app.ui.state = ChatState::Idle;
}

fn cancel_current_request(app: &mut App) {
    if !app.ui.is_in_flight() {
        return;
    }
    app.session.cancel_current_stream();
    app.ui.reset_request_state();
    app.ui.state = ChatState::Idle;
    app.set_status("Request cancelled");
}
