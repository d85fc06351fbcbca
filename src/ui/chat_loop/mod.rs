//! Interactive chat session runner.
//!
//! [`run_chat`] loads local preferences, builds the [`App`], takes over the
//! terminal, and hands control to the event loop until the user quits.

mod event_loop;
mod keybindings;
mod lifecycle;

use std::error::Error;

use tracing::info;

use crate::core::app::App;
use crate::core::config::ClientConfig;
use crate::core::preferences::{config_dir, FilePreferenceStore, FirstRunMarker, PreferenceStore};

use lifecycle::{restore_terminal, setup_terminal};

pub async fn run_chat(config: ClientConfig) -> Result<(), Box<dyn Error>> {
    let dir = config_dir();
    let store = FilePreferenceStore::new(dir.clone());
    let marker = FirstRunMarker::new(dir);

    let first_run = marker.is_first_run();
    let mut app = App::new(&config, store.load(), first_run);
    if first_run {
        marker.mark_complete();
    }

    info!(base_url = %config.base_url, first_run, "starting chat session");

    let mut terminal = setup_terminal()?;
    let result = event_loop::run_event_loop(&mut terminal, &mut app, &store).await;
    let restored = restore_terminal(&mut terminal);

    info!(
        turns = app.ui.turns.len(),
        completed = app.session.completed_turns,
        "chat session ended"
    );
    result?;
    restored
}
