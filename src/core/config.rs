//! Runtime configuration for a chat session.
//!
//! Values are resolved in order: command-line flag, environment, built-in
//! default. Nothing here reads files; persisted user choices live in
//! [`crate::core::preferences`].

use std::path::PathBuf;
use std::time::Duration;

use crate::core::constants::{API_URL_ENV, DEFAULT_API_URL, DEFAULT_IDLE_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub idle_timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            log_file: None,
        }
    }
}

impl ClientConfig {
    pub fn resolve(
        url_flag: Option<String>,
        timeout_secs: Option<u64>,
        log_file: Option<PathBuf>,
    ) -> Self {
        Self::resolve_with_env(url_flag, timeout_secs, log_file, |key| {
            std::env::var(key).ok()
        })
    }

    fn resolve_with_env<F>(
        url_flag: Option<String>,
        timeout_secs: Option<u64>,
        log_file: Option<PathBuf>,
        env: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = url_flag
            .filter(|url| !url.trim().is_empty())
            .or_else(|| env(API_URL_ENV).filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let idle_timeout = timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_IDLE_TIMEOUT);

        Self {
            base_url: normalize_base_url(&base_url),
            idle_timeout,
            log_file,
        }
    }
}

/// Removes trailing slashes so endpoint paths can be appended safely.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Full URL of the streaming chat endpoint for `base_url`.
pub fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat", normalize_base_url(base_url))
}
