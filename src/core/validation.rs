//! Chat request validation.
//!
//! Mirrors the rules the chat service applies to incoming messages so the
//! client can reject a submission before opening a connection, and decodes the
//! structured validation errors the service returns when it rejects one.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::constants::MAX_MESSAGE_CHARS;

const BLOCKED_PATTERNS: &[&str] = &["<script", "</script", "javascript:", "onerror=", "onload="];

/// A single problem attached to one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn message(text: &str) -> Self {
        Self {
            field: "message".to_string(),
            message: text.to_string(),
        }
    }
}

/// Validation failure with one entry per offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    #[cfg(test)]
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    /// Decodes a service response body of the form
    /// `{"error": "...", "details": [{"field": "...", "message": "..."}]}`.
    pub fn from_response_body(body: &str) -> Option<Self> {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            details: Vec<FieldError>,
        }

        let body: Body = serde_json::from_str(body.trim()).ok()?;
        if body.details.is_empty() {
            return None;
        }
        Some(Self {
            errors: body.details,
        })
    }

    /// Field-level lines exactly as they should appear to the user.
    pub fn display_lines(&self) -> String {
        self.errors
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {}", self.display_lines())
    }
}

impl StdError for ValidationError {}

/// Payload posted to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_chat_message(&self.message)
    }
}

pub fn validate_chat_message(message: &str) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if message.trim().is_empty() {
        errors.push(FieldError::message("Message cannot be empty"));
    } else if message.chars().count() > MAX_MESSAGE_CHARS {
        errors.push(FieldError::message(&format!(
            "Message must be {MAX_MESSAGE_CHARS} characters or less"
        )));
    }

    if contains_blocked_pattern(message) {
        errors.push(FieldError::message("Message contains disallowed content"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { errors })
    }
}

fn contains_blocked_pattern(message: &str) -> bool {
    let lower = message.to_lowercase();
    BLOCKED_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}
