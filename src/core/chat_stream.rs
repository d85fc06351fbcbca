//! Streaming client for the chat service.
//!
//! A request is spawned onto the runtime and its decoded events are forwarded
//! over an unbounded channel, each tagged with the stream id it belongs to.
//! Every sequence ends with exactly one terminal event (`Final` or `Error`)
//! unless it is cancelled, in which case nothing further is sent.

use std::time::Duration;

use futures_util::{Stream, StreamExt};
use memchr::memchr;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::config::chat_endpoint;
use crate::core::message::{ProgressItem, Source};
use crate::core::validation::{ChatRequest, ValidationError};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Progress { items: Vec<ProgressItem> },
    Sources { sources: Vec<Source> },
    Partial { text: String },
    Final { text: String },
    Suggestions { questions: Vec<String> },
    Error { message: String },
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Final { .. } | StreamEvent::Error { .. })
    }

    fn error(message: impl Into<String>) -> Self {
        StreamEvent::Error {
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMessage {
    Event(StreamEvent),
    /// Non-fatal notice, such as the first malformed event of a stream.
    Warning(String),
}

#[derive(Debug, PartialEq, Eq)]
enum LineOutcome {
    Ignore,
    Event(StreamEvent),
    Malformed(String),
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn parse_sse_line(line: &str) -> LineOutcome {
    let line = line.trim_end_matches('\r');
    let Some(payload) = extract_data_payload(line) else {
        // Comments (": keep-alive"), `event:`/`id:`/`retry:` fields and frame
        // separators carry nothing the client needs.
        return LineOutcome::Ignore;
    };

    let payload = payload.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return LineOutcome::Ignore;
    }

    match serde_json::from_str::<StreamEvent>(payload) {
        Ok(event) => LineOutcome::Event(event),
        Err(err) => LineOutcome::Malformed(err.to_string()),
    }
}

/// Incremental decoder turning raw body chunks into stream messages.
///
/// Lines may be split across chunks; partial lines stay buffered until their
/// newline arrives or [`SseDecoder::finish`] is called.
/// Longest line the decoder buffers while waiting for its newline.
const MAX_PENDING_LINE: usize = 1024 * 1024;

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    malformed_count: usize,
    /// Set after an oversized line was dropped; the rest of it is skipped.
    discarding: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamMessage> {
        self.buffer.extend_from_slice(chunk);
        let mut messages = Vec::new();

        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            if std::mem::take(&mut self.discarding) {
                continue;
            }
            self.decode_line(&line[..newline_pos], &mut messages);
        }

        if self.buffer.len() > MAX_PENDING_LINE {
            let dropped = self.buffer.len();
            self.buffer = Vec::new();
            if !std::mem::replace(&mut self.discarding, true) {
                self.record_malformed(
                    format!("stream line exceeded {MAX_PENDING_LINE} bytes ({dropped} buffered)"),
                    &mut messages,
                );
            }
        }

        messages
    }

    /// Decodes whatever is left in the buffer once the body has ended.
    pub fn finish(&mut self) -> Vec<StreamMessage> {
        let mut messages = Vec::new();
        let rest = std::mem::take(&mut self.buffer);
        if !rest.is_empty() && !std::mem::take(&mut self.discarding) {
            self.decode_line(&rest, &mut messages);
        }
        messages
    }

    #[cfg(test)]
    pub fn malformed_count(&self) -> usize {
        self.malformed_count
    }

    fn decode_line(&mut self, raw: &[u8], out: &mut Vec<StreamMessage>) {
        let outcome = match std::str::from_utf8(raw) {
            Ok(line) => parse_sse_line(line),
            Err(err) => LineOutcome::Malformed(format!("invalid UTF-8 in stream: {err}")),
        };

        match outcome {
            LineOutcome::Ignore => {}
            LineOutcome::Event(event) => out.push(StreamMessage::Event(event)),
            LineOutcome::Malformed(reason) => self.record_malformed(reason, out),
        }
    }

    fn record_malformed(&mut self, reason: String, out: &mut Vec<StreamMessage>) {
        self.malformed_count += 1;
        if self.malformed_count == 1 {
            warn!(%reason, "dropping malformed stream event");
            out.push(StreamMessage::Warning(
                "Some of the response could not be read and was skipped.".to_string(),
            ));
        } else {
            debug!(%reason, count = self.malformed_count, "dropping malformed stream event");
        }
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Formats an unsuccessful response body for the transcript.
///
/// Validation failures are shown verbatim, one `field: message` line each.
fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error: <empty response>".to_string();
    }

    if let Some(validation) = ValidationError::from_response_body(trimmed) {
        return validation.display_lines();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            return match extract_error_summary(&json_value) {
                Some(summary) if !summary.is_empty() => {
                    format!("API Error: {summary}\n{pretty_json}")
                }
                _ => format!("API Error:\n{pretty_json}"),
            };
        }
    }

    format!("API Error: {trimmed}")
}

#[derive(Clone)]
struct StreamEmitter {
    tx: mpsc::UnboundedSender<(StreamMessage, u64)>,
    stream_id: u64,
}

impl StreamEmitter {
    fn send(&self, message: StreamMessage) {
        let _ = self.tx.send((message, self.stream_id));
    }

    fn send_event(&self, event: StreamEvent) {
        self.send(StreamMessage::Event(event));
    }
}

fn timeout_message(idle_timeout: Duration) -> String {
    format!(
        "No response from the chat service within {} seconds.",
        idle_timeout.as_secs().max(1)
    )
}

/// Forwards decoded events from `body` until a terminal event is seen, the
/// body ends, a chunk fails, or no chunk arrives within `idle_timeout`.
async fn forward_body<S, B, E>(body: S, idle_timeout: Duration, emitter: &StreamEmitter)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut body = std::pin::pin!(body);
    let mut decoder = SseDecoder::new();

    loop {
        let next = match tokio::time::timeout(idle_timeout, body.next()).await {
            Ok(next) => next,
            Err(_) => {
                debug!(stream_id = emitter.stream_id, "stream idle timeout");
                emitter.send_event(StreamEvent::error(timeout_message(idle_timeout)));
                return;
            }
        };

        let messages = match next {
            Some(Ok(chunk)) => decoder.push(chunk.as_ref()),
            Some(Err(err)) => {
                emitter.send_event(StreamEvent::error(format!(
                    "The connection to the chat service failed: {err}"
                )));
                return;
            }
            None => {
                let trailing = decoder.finish();
                if forward_messages(trailing, emitter) {
                    return;
                }
                emitter.send_event(StreamEvent::error(
                    "The connection closed before the response finished.",
                ));
                return;
            }
        };

        if forward_messages(messages, emitter) {
            return;
        }
    }
}

/// Returns `true` once a terminal event has been forwarded.
fn forward_messages(messages: Vec<StreamMessage>, emitter: &StreamEmitter) -> bool {
    for message in messages {
        let terminal = matches!(&message, StreamMessage::Event(event) if event.is_terminal());
        emitter.send(message);
        if terminal {
            return true;
        }
    }
    false
}

pub struct StreamParams {
    pub client: reqwest::Client,
    pub base_url: String,
    pub message: String,
    pub idle_timeout: Duration,
    pub cancel_token: CancellationToken,
    pub stream_id: u64,
}

async fn run_request(
    client: reqwest::Client,
    base_url: String,
    message: String,
    idle_timeout: Duration,
    emitter: &StreamEmitter,
) {
    let url = chat_endpoint(&base_url);
    debug!(stream_id = emitter.stream_id, %url, "opening chat stream");

    let request = client
        .post(url)
        .header("Accept", "text/event-stream")
        .json(&ChatRequest::new(message))
        .send();

    let response = match tokio::time::timeout(idle_timeout, request).await {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            emitter.send_event(StreamEvent::error(format!(
                "Could not reach the chat service: {err}"
            )));
            return;
        }
        Err(_) => {
            emitter.send_event(StreamEvent::error(timeout_message(idle_timeout)));
            return;
        }
    };

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        debug!(stream_id = emitter.stream_id, %status, "chat service rejected request");
        emitter.send_event(StreamEvent::error(format_api_error(&error_text)));
        return;
    }

    forward_body(response.bytes_stream(), idle_timeout, emitter).await;
    debug!(stream_id = emitter.stream_id, "chat stream finished");
}

#[derive(Clone)]
pub struct ChatStreamService {
    tx: mpsc::UnboundedSender<(StreamMessage, u64)>,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(StreamMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_stream(&self, params: StreamParams) {
        let emitter = StreamEmitter {
            tx: self.tx.clone(),
            stream_id: params.stream_id,
        };
        tokio::spawn(async move {
            let StreamParams {
                client,
                base_url,
                message,
                idle_timeout,
                cancel_token,
                stream_id,
            } = params;

            tokio::select! {
                _ = run_request(client, base_url, message, idle_timeout, &emitter) => {}
                _ = cancel_token.cancelled() => {
                    debug!(stream_id, "chat stream cancelled");
                }
            }
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: StreamMessage, stream_id: u64) {
        let _ = self.tx.send((message, stream_id));
    }
}
