//! Diagnostic logging to a file.
//!
//! The chat UI owns the terminal, so tracing output only goes to a file
//! named on the command line. Without one, no subscriber is installed and
//! every event is dropped.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::constants::LOG_FILTER_ENV;

const DEFAULT_FILTER: &str = "info";

/// Appends tracing output to `path`, filtered by `CARDTERM_LOG` (default
/// `info`).
pub fn init_tracing(path: &Path) -> Result<(), Box<dyn Error + Send + Sync>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()?;
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
