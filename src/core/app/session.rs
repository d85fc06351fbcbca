use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::core::chat_stream::StreamParams;
use crate::core::config::ClientConfig;

/// Connection details and bookkeeping for the request currently in flight.
pub struct SessionContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub idle_timeout: Duration,
    pub current_stream_id: u64,
    pub stream_cancel_token: Option<CancellationToken>,
    pub completed_turns: usize,
    pub feedback_offered: bool,
}

impl SessionContext {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            idle_timeout: config.idle_timeout,
            current_stream_id: 0,
            stream_cancel_token: None,
            completed_turns: 0,
            feedback_offered: false,
        }
    }

    /// Only the newest stream counts, and only while it has not finished.
    pub fn is_current_stream(&self, stream_id: u64) -> bool {
        self.stream_cancel_token.is_some() && self.current_stream_id == stream_id
    }

    /// Cancels any previous stream and hands out a fresh id and token.
    pub fn start_new_stream(&mut self) -> (CancellationToken, u64) {
        self.cancel_current_stream();
        self.current_stream_id += 1;
        let token = CancellationToken::new();
        self.stream_cancel_token = Some(token.clone());
        (token, self.current_stream_id)
    }

    pub fn cancel_current_stream(&mut self) {
        if let Some(token) = self.stream_cancel_token.take() {
            token.cancel();
        }
    }

    /// Marks the current stream as finished without cancelling its task.
    pub fn end_stream(&mut self) {
        self.stream_cancel_token = None;
    }

    pub fn build_stream_params(
        &self,
        message: String,
        cancel_token: CancellationToken,
        stream_id: u64,
    ) -> StreamParams {
        StreamParams {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            message,
            idle_timeout: self.idle_timeout,
            cancel_token,
            stream_id,
        }
    }
}
