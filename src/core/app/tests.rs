use super::*;
use crate::core::chat_stream::StreamEvent;
use crate::core::message::{ProgressStatus, TranscriptRole};
use crate::core::preferences::Preferences;
use crate::utils::test_utils::{
    create_test_app, create_test_app_with_preferences, create_test_source, progress_item,
};
use tui_textarea::{Input, Key};

fn submit(app: &mut App, text: &str) -> Option<AppCommand> {
    app.ui.set_input_text(text);
    apply_action(app, AppAction::SubmitInput)
}

fn current_id(app: &App) -> u64 {
    app.session.current_stream_id
}

fn send(app: &mut App, event: StreamEvent) -> Option<AppCommand> {
    let stream_id = current_id(app);
    apply_action(app, AppAction::StreamEvent { event, stream_id })
}

fn complete_turn(app: &mut App, question: &str, answer: &str) {
    submit(app, question);
    send(
        app,
        StreamEvent::Final {
            text: answer.to_string(),
        },
    );
}

fn type_char(c: char) -> AppAction {
    AppAction::EditInput {
        input: Input {
            key: Key::Char(c),
            ..Input::default()
        },
    }
}

#[test]
fn valid_submission_appends_one_user_turn_and_spawns_stream() {
    let mut app = create_test_app();
    let command = submit(&mut app, "Hi");

    assert_eq!(app.state(), ChatState::AwaitingResponse);
    assert_eq!(app.ui.turns.len(), 1);
    assert_eq!(app.ui.turns[0].role, TranscriptRole::User);
    assert_eq!(app.ui.turns[0].content, "Hi");
    assert_eq!(app.ui.get_input_text(), "");

    match command {
        Some(AppCommand::SpawnStream(params)) => {
            assert_eq!(params.message, "Hi");
            assert_eq!(params.stream_id, current_id(&app));
            assert_eq!(params.base_url, "https://api.test.com/api");
        }
        _ => panic!("expected a stream to be spawned"),
    }
}

#[test]
fn full_exchange_produces_one_assistant_turn() {
    let mut app = create_test_app();
    submit(&mut app, "Hi");
    assert_eq!(app.state(), ChatState::AwaitingResponse);

    send(
        &mut app,
        StreamEvent::Progress {
            items: vec![progress_item("think", ProgressStatus::InProgress)],
        },
    );
    assert_eq!(app.state(), ChatState::Responding);

    send(
        &mut app,
        StreamEvent::Final {
            text: "Hello!".into(),
        },
    );

    assert_eq!(app.state(), ChatState::Idle);
    let assistant: Vec<_> = app
        .ui
        .turns
        .iter()
        .filter(|turn| turn.role == TranscriptRole::Assistant)
        .collect();
    assert_eq!(assistant.len(), 1);
    assert_eq!(assistant[0].content, "Hello!");
    assert!(app.ui.progress.is_empty());
}

#[test]
fn empty_submission_is_ignored() {
    let mut app = create_test_app();
    let command = submit(&mut app, "   ");

    assert!(command.is_none());
    assert_eq!(app.state(), ChatState::Idle);
    assert!(app.ui.turns.is_empty());
}

#[test]
fn blocked_submission_reports_field_error() {
    let mut app = create_test_app();
    let command = submit(&mut app, "<script>alert('x')</script>");

    assert!(command.is_none());
    assert_eq!(app.state(), ChatState::Idle);
    assert_eq!(app.ui.turns.len(), 1);
    assert_eq!(app.ui.turns[0].role, TranscriptRole::AppError);
    assert_eq!(
        app.ui.turns[0].content,
        "message: Message contains disallowed content"
    );
}

#[test]
fn overlong_submission_is_rejected_locally() {
    let mut app = create_test_app();
    let command = submit(&mut app, &"a".repeat(1001));

    assert!(command.is_none());
    assert_eq!(app.state(), ChatState::Idle);
    assert!(app
        .ui
        .turns
        .iter()
        .all(|turn| turn.role != TranscriptRole::User));
    assert_eq!(
        app.ui.turns.last().map(|turn| turn.content.as_str()),
        Some("message: Message must be 1000 characters or less")
    );
}

#[test]
fn sources_are_attached_in_arrival_order() {
    let mut app = create_test_app();
    submit(&mut app, "What have you built?");
    send(
        &mut app,
        StreamEvent::Sources {
            sources: vec![create_test_source("a", "First project")],
        },
    );
    assert_eq!(app.state(), ChatState::Responding);
    send(
        &mut app,
        StreamEvent::Sources {
            sources: vec![create_test_source("b", "Second project")],
        },
    );
    send(
        &mut app,
        StreamEvent::Final {
            text: "Two things.".into(),
        },
    );

    let turn = app.ui.turns.last().expect("assistant turn");
    let ids: Vec<_> = turn.sources.iter().map(|source| source.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert!(app.ui.sources.is_empty());
}

#[test]
fn cancel_returns_to_idle_and_ignores_late_events() {
    let mut app = create_test_app();
    submit(&mut app, "Hi");
    let stream_id = current_id(&app);
    send(&mut app, StreamEvent::Partial { text: "Hel".into() });
    let turns_before = app.ui.turns.len();

    apply_action(&mut app, AppAction::CancelStreaming);
    assert_eq!(app.state(), ChatState::Idle);
    assert_eq!(app.ui.status.as_deref(), Some("Request cancelled"));
    assert!(app.ui.partial_response.is_empty());

    apply_action(
        &mut app,
        AppAction::StreamEvent {
            event: StreamEvent::Final {
                text: "Hello!".into(),
            },
            stream_id,
        },
    );
    apply_action(
        &mut app,
        AppAction::StreamWarning {
            message: "late".into(),
            stream_id,
        },
    );

    assert_eq!(app.ui.turns.len(), turns_before);
    assert_eq!(app.state(), ChatState::Idle);
}

#[test]
fn events_from_a_replaced_stream_are_ignored() {
    let mut app = create_test_app();
    submit(&mut app, "first");
    let old_id = current_id(&app);
    apply_action(&mut app, AppAction::CancelStreaming);
    submit(&mut app, "second");

    apply_action(
        &mut app,
        AppAction::StreamEvent {
            event: StreamEvent::Partial {
                text: "stale".into(),
            },
            stream_id: old_id,
        },
    );
    assert_eq!(app.state(), ChatState::AwaitingResponse);
    assert!(app.ui.partial_response.is_empty());
}

#[test]
fn stream_error_appends_error_turn_and_idles() {
    let mut app = create_test_app();
    submit(&mut app, "Hi");
    send(
        &mut app,
        StreamEvent::Error {
            message: "Connection closed before the answer finished.".into(),
        },
    );

    assert_eq!(app.state(), ChatState::Idle);
    let last = app.ui.turns.last().expect("error turn");
    assert_eq!(last.role, TranscriptRole::AppError);
    assert_eq!(last.content, "Connection closed before the answer finished.");
}

#[test]
fn warning_appends_warning_turn_without_changing_state() {
    let mut app = create_test_app();
    submit(&mut app, "Hi");
    let stream_id = current_id(&app);
    apply_action(
        &mut app,
        AppAction::StreamWarning {
            message: "Some of the response could not be read and was skipped.".into(),
            stream_id,
        },
    );

    assert_eq!(app.state(), ChatState::AwaitingResponse);
    assert_eq!(
        app.ui.turns.last().map(|turn| turn.role),
        Some(TranscriptRole::AppWarning)
    );
}

#[test]
fn suggestions_focus_after_final_and_navigation_clamps() {
    let mut app = create_test_app();
    submit(&mut app, "Hi");
    send(
        &mut app,
        StreamEvent::Suggestions {
            questions: vec!["One?".into(), "Two?".into(), "Three?".into()],
        },
    );
    send(&mut app, StreamEvent::Final { text: "Hey".into() });
    assert_eq!(app.state(), ChatState::SuggestionFocus { selected: 0 });
    assert_eq!(app.ui.turns.last().map(|t| t.suggestions.len()), Some(3));

    apply_action(&mut app, AppAction::SuggestionMoveUp);
    assert_eq!(app.state(), ChatState::SuggestionFocus { selected: 0 });

    for _ in 0..10 {
        apply_action(&mut app, AppAction::SuggestionMoveDown);
        match app.state() {
            ChatState::SuggestionFocus { selected } => assert!(selected < 3),
            other => panic!("unexpected state {other:?}"),
        }
    }
    assert_eq!(app.state(), ChatState::SuggestionFocus { selected: 2 });

    apply_action(&mut app, AppAction::SuggestionMoveUp);
    assert_eq!(app.ui.selected_suggestion(), Some("Two?"));
}

#[test]
fn accepting_a_suggestion_submits_it() {
    let mut app = create_test_app();
    submit(&mut app, "Hi");
    send(
        &mut app,
        StreamEvent::Suggestions {
            questions: vec!["What's next?".into(), "Where are you based?".into()],
        },
    );
    send(&mut app, StreamEvent::Final { text: "Hey".into() });
    apply_action(&mut app, AppAction::SuggestionMoveDown);

    let command = apply_action(&mut app, AppAction::SuggestionAccept);
    match command {
        Some(AppCommand::SpawnStream(params)) => {
            assert_eq!(params.message, "Where are you based?")
        }
        _ => panic!("expected a stream to be spawned"),
    }
    assert_eq!(app.state(), ChatState::AwaitingResponse);
    assert!(app.ui.suggestions.is_empty());
    assert_eq!(
        app.ui.turns.last().map(|turn| turn.content.as_str()),
        Some("Where are you based?")
    );
}

#[test]
fn typing_dismisses_suggestions_and_keeps_the_character() {
    let mut app = create_test_app();
    submit(&mut app, "Hi");
    send(
        &mut app,
        StreamEvent::Suggestions {
            questions: vec!["More?".into()],
        },
    );
    send(&mut app, StreamEvent::Final { text: "Hey".into() });

    apply_action(&mut app, type_char('w'));
    assert_eq!(app.state(), ChatState::Idle);
    assert!(app.ui.suggestions.is_empty());
    assert_eq!(app.ui.get_input_text(), "w");
}

#[test]
fn escape_dismisses_suggestions() {
    let mut app = create_test_app();
    submit(&mut app, "Hi");
    send(
        &mut app,
        StreamEvent::Suggestions {
            questions: vec!["More?".into()],
        },
    );
    send(&mut app, StreamEvent::Final { text: "Hey".into() });

    apply_action(&mut app, AppAction::SuggestionDismiss);
    assert_eq!(app.state(), ChatState::Idle);
    assert!(app.ui.suggestions.is_empty());
}

#[test]
fn feedback_overlay_appears_once_after_three_turns() {
    let mut app = create_test_app();
    complete_turn(&mut app, "one", "1");
    complete_turn(&mut app, "two", "2");
    assert_eq!(app.ui.overlay, None);

    complete_turn(&mut app, "three", "3");
    assert_eq!(app.ui.overlay, Some(Overlay::Feedback));
    assert_eq!(app.state(), ChatState::Idle);

    apply_action(&mut app, AppAction::FeedbackDismiss);
    assert_eq!(app.ui.overlay, None);
    assert_eq!(app.state(), ChatState::Idle);

    complete_turn(&mut app, "four", "4");
    complete_turn(&mut app, "five", "5");
    complete_turn(&mut app, "six", "6");
    assert_eq!(app.ui.overlay, None);
}

#[test]
fn feedback_overlay_respects_disabled_preference() {
    let mut app = create_test_app_with_preferences(Preferences {
        email_prompt_enabled: false,
        feedback_prompt_enabled: false,
        ..Preferences::default()
    });
    for n in 0..4 {
        complete_turn(&mut app, &format!("q{n}"), "a");
    }
    assert_eq!(app.ui.overlay, None);
}

#[test]
fn feedback_overlay_does_not_alter_chat_state() {
    let mut app = create_test_app();
    complete_turn(&mut app, "one", "1");
    complete_turn(&mut app, "two", "2");
    submit(&mut app, "three");
    send(
        &mut app,
        StreamEvent::Suggestions {
            questions: vec!["Next?".into()],
        },
    );
    send(&mut app, StreamEvent::Final { text: "3".into() });

    assert_eq!(app.ui.overlay, Some(Overlay::Feedback));
    assert_eq!(app.state(), ChatState::SuggestionFocus { selected: 0 });

    let command = apply_action(&mut app, AppAction::FeedbackRate { rating: 3 });
    assert_eq!(app.state(), ChatState::SuggestionFocus { selected: 0 });
    assert_eq!(app.ui.overlay, None);
    match command {
        Some(AppCommand::PersistPreferences(prefs)) => {
            assert_eq!(prefs.feedback.len(), 1);
            assert_eq!(prefs.feedback[0].rating, 3);
        }
        _ => panic!("expected preferences to be persisted"),
    }
}

#[test]
fn disabling_feedback_persists_preference() {
    let mut app = create_test_app();
    for n in 0..3 {
        complete_turn(&mut app, &format!("q{n}"), "a");
    }
    let command = apply_action(&mut app, AppAction::FeedbackDisable);

    assert!(!app.preferences.feedback_prompt_enabled);
    match command {
        Some(AppCommand::PersistPreferences(prefs)) => assert!(!prefs.feedback_prompt_enabled),
        _ => panic!("expected preferences to be persisted"),
    }
}

#[test]
fn rating_without_overlay_does_nothing() {
    let mut app = create_test_app();
    let command = apply_action(&mut app, AppAction::FeedbackRate { rating: 2 });
    assert!(command.is_none());
    assert!(app.preferences.feedback.is_empty());
}

#[test]
fn onboarding_shows_at_startup_and_can_be_disabled() {
    let mut app = create_test_app_with_preferences(Preferences::default());
    assert_eq!(app.ui.overlay, Some(Overlay::Onboarding));

    let command = apply_action(&mut app, AppAction::OnboardingDisable);
    assert_eq!(app.ui.overlay, None);
    match command {
        Some(AppCommand::PersistPreferences(prefs)) => assert!(!prefs.email_prompt_enabled),
        _ => panic!("expected preferences to be persisted"),
    }
}

#[test]
fn onboarding_dismiss_is_session_only() {
    let mut app = create_test_app_with_preferences(Preferences::default());
    let command = apply_action(&mut app, AppAction::OnboardingDismiss);
    assert!(command.is_none());
    assert_eq!(app.ui.overlay, None);
    assert!(app.preferences.email_prompt_enabled);
}

#[test]
fn first_run_adds_welcome_message() {
    let prefs = Preferences {
        email_prompt_enabled: false,
        ..Preferences::default()
    };
    let app = App::new(&crate::core::config::ClientConfig::default(), prefs, true);
    assert_eq!(app.ui.turns.len(), 1);
    assert_eq!(app.ui.turns[0].role, TranscriptRole::AppInfo);
}

#[test]
fn quit_requests_exit_and_cancels_stream() {
    let mut app = create_test_app();
    submit(&mut app, "Hi");
    let token = app
        .session
        .stream_cancel_token
        .clone()
        .expect("active stream");

    apply_action(&mut app, AppAction::Quit);
    assert!(app.ui.exit_requested);
    assert!(token.is_cancelled());
}

#[test]
fn apply_actions_collects_commands() {
    let mut app = create_test_app();
    app.ui.set_input_text("Hi");
    let commands = apply_actions(&mut app, [AppAction::SubmitInput, AppAction::Tick]);
    assert_eq!(commands.len(), 1);
    assert_eq!(app.ui.spinner_frame, 1);
}
