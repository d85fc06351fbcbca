//! Event polling, dispatching, and UI rendering loop.
//!
//! The loop owns the [`App`] outright. Keyboard input, stream messages and
//! the animation tick are multiplexed with `tokio::select!`; every batch of
//! actions is applied through the reducer and followed by one redraw.

use std::error::Error;

use ratatui::crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;
use tracing::debug;

use crate::core::app::{apply_actions, App, AppAction, AppCommand};
use crate::core::chat_stream::{ChatStreamService, StreamMessage};
use crate::core::constants::TICK_INTERVAL;
use crate::core::preferences::PreferenceStore;
use crate::ui::renderer::ui;

use super::keybindings::actions_for_key;

pub async fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &dyn PreferenceStore,
) -> Result<(), Box<dyn Error>> {
    let (stream_service, mut rx) = ChatStreamService::new();
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);

    terminal.draw(|f| ui(f, app))?;

    while !app.ui.exit_requested {
        let actions = tokio::select! {
            _ = ticker.tick() => {
                if !app.ui.is_in_flight() {
                    continue;
                }
                vec![AppAction::Tick]
            }

            Some((message, stream_id)) = rx.recv() => {
                let mut actions = vec![stream_action(message, stream_id)];
                actions.extend(drain_stream_messages(&mut rx));
                actions
            }

            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => actions_for_key(app, key),
                Some(Ok(Event::Resize(_, _))) => Vec::new(),
                Some(Ok(_)) => continue,
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
        };

        let commands = apply_actions(app, actions);
        execute_commands(commands, &stream_service, store);
        terminal.draw(|f| ui(f, app))?;
    }

    app.session.cancel_current_stream();
    Ok(())
}

/// Pulls whatever else is already queued so a burst of events costs one
/// redraw.
fn drain_stream_messages(rx: &mut mpsc::UnboundedReceiver<(StreamMessage, u64)>) -> Vec<AppAction> {
    let mut actions = Vec::new();
    while let Ok((message, stream_id)) = rx.try_recv() {
        actions.push(stream_action(message, stream_id));
    }
    actions
}

fn stream_action(message: StreamMessage, stream_id: u64) -> AppAction {
    match message {
        StreamMessage::Event(event) => AppAction::StreamEvent { event, stream_id },
        StreamMessage::Warning(message) => AppAction::StreamWarning { message, stream_id },
    }
}

fn execute_commands(
    commands: Vec<AppCommand>,
    stream_service: &ChatStreamService,
    store: &dyn PreferenceStore,
) {
    for command in commands {
        match command {
            AppCommand::SpawnStream(params) => {
                debug!(stream_id = params.stream_id, "spawning chat stream");
                stream_service.spawn_stream(params);
            }
            AppCommand::PersistPreferences(preferences) => store.save(&preferences),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_action, ChatState};
    use crate::core::chat_stream::StreamEvent;
    use crate::core::preferences::Preferences;
    use crate::utils::test_utils::{create_test_app, MemoryPreferenceStore};

    #[test]
    fn persist_command_saves_preferences() {
        let store = MemoryPreferenceStore::default();
        let (service, _rx) = ChatStreamService::new();
        let prefs = Preferences {
            feedback_prompt_enabled: false,
            ..Preferences::default()
        };

        execute_commands(
            vec![AppCommand::PersistPreferences(prefs.clone())],
            &service,
            &store,
        );

        assert_eq!(*store.saves.borrow(), 1);
        assert_eq!(store.load(), prefs);
    }

    #[tokio::test]
    async fn queued_stream_messages_become_actions_in_order() {
        let (service, mut rx) = ChatStreamService::new();
        let mut app = create_test_app();
        app.ui.set_input_text("Hi");
        apply_action(&mut app, AppAction::SubmitInput);
        let stream_id = app.session.current_stream_id;

        service.send_for_test(
            StreamMessage::Event(StreamEvent::Partial {
                text: "Hel".into(),
            }),
            stream_id,
        );
        service.send_for_test(
            StreamMessage::Event(StreamEvent::Final {
                text: "Hello!".into(),
            }),
            stream_id,
        );

        let actions = drain_stream_messages(&mut rx);
        assert_eq!(actions.len(), 2);
        apply_actions(&mut app, actions);

        assert_eq!(app.state(), ChatState::Idle);
        assert_eq!(
            app.ui.turns.last().map(|turn| turn.content.as_str()),
            Some("Hello!")
        );
    }

    #[test]
    fn warnings_map_to_warning_actions() {
        match stream_action(StreamMessage::Warning("skipped".into()), 7) {
            AppAction::StreamWarning { message, stream_id } => {
                assert_eq!(message, "skipped");
                assert_eq!(stream_id, 7);
            }
            _ => panic!("expected a warning action"),
        }
    }
}
