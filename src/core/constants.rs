//! Shared constants used across the application

use std::time::Duration;

/// Chat backend used when neither `--url` nor the environment override is set.
pub const DEFAULT_API_URL: &str = "https://api.cardterm.dev/api";

/// Environment variable that overrides the chat backend base URL.
pub const API_URL_ENV: &str = "CARDTERM_API_URL";

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "CARDTERM_LOG";

/// Longest message the backend accepts, counted in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// How long the stream client waits for the next event before giving up.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Completed assistant turns before the feedback prompt is offered.
pub const FEEDBACK_PROMPT_AFTER_TURNS: usize = 3;

/// Spinner frame interval while a request is in flight.
pub const TICK_INTERVAL: Duration = Duration::from_millis(120);
