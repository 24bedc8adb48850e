use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use tokio::time::{timeout, Duration};
use tracing::{debug, trace};

use super::models::StreamResponse;
use super::FragmentStream;
use crate::error::{AgentError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    Fragment(String),
    ProviderError { status: u16, message: String },
    Done,
}

/// Incremental server-sent-events decoder for chat completion chunks.
///
/// Bytes are buffered until a full line is available, so a UTF-8 sequence
/// split across network chunks is decoded intact.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(line_end) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=line_end).collect();
            let line = String::from_utf8_lossy(&raw[..line_end]);
            decode_line(line.trim_end_matches('\r'), &mut events);
        }
        events
    }

    /// Decode whatever remains once the body has ended without a newline.
    pub fn finish(&mut self) -> Vec<SseEvent> {
        let mut events = Vec::new();
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&rest);
            decode_line(line.trim_end_matches('\r'), &mut events);
        }
        events
    }
}

fn decode_line(line: &str, events: &mut Vec<SseEvent>) {
    if line.is_empty() || line.starts_with(':') {
        return;
    }

    let Some(colon_pos) = line.find(':') else {
        trace!(line, "ignoring SSE line without field separator");
        return;
    };
    let field = line[..colon_pos].trim();
    let value = line[colon_pos + 1..].trim_start();

    if field != "data" {
        trace!(field, value, "ignoring SSE field");
        return;
    }

    if value == "[DONE]" {
        events.push(SseEvent::Done);
        return;
    }

    match serde_json::from_str::<StreamResponse>(value) {
        Ok(parsed) => {
            if let Some(error) = parsed.error {
                events.push(SseEvent::ProviderError {
                    status: error.status(500),
                    message: error.message(),
                });
                return;
            }
            for choice in parsed.choices.into_iter().flatten() {
                if let Some(content) = choice.delta.and_then(|d| d.content) {
                    if !content.is_empty() {
                        events.push(SseEvent::Fragment(content));
                    }
                }
            }
        }
        Err(e) => debug!(error = %e, "skipping unparseable stream chunk"),
    }
}

struct StreamState<S> {
    body: S,
    decoder: SseDecoder,
    ready: VecDeque<Result<String>>,
    finished: bool,
}

impl<S> StreamState<S> {
    /// Queue decoded events; returns true once the stream has ended.
    fn absorb(&mut self, events: Vec<SseEvent>) -> bool {
        for event in events {
            match event {
                SseEvent::Fragment(text) => self.ready.push_back(Ok(text)),
                SseEvent::ProviderError { status, message } => {
                    self.ready.push_back(Err(AgentError::Api { status, message }));
                    return true;
                }
                SseEvent::Done => return true,
            }
        }
        false
    }
}

/// Turn a streaming HTTP body into a lazy sequence of content fragments.
///
/// The sequence ends at `data: [DONE]`, at end of body, on a provider error
/// event, or when no bytes arrive for `timeout_secs`.
pub fn fragment_stream(response: reqwest::Response, timeout_secs: u64) -> FragmentStream {
    let state = StreamState {
        body: Box::pin(response.bytes_stream()),
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
        finished: false,
    };
    let chunk_timeout = Duration::from_secs(timeout_secs);

    let fragments = stream::unfold(state, move |mut state| async move {
        loop {
            if let Some(item) = state.ready.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match timeout(chunk_timeout, state.body.next()).await {
                Ok(Some(Ok(chunk))) => {
                    let events = state.decoder.push(&chunk);
                    state.finished = state.absorb(events);
                }
                Ok(Some(Err(e))) => {
                    state.finished = true;
                    state.ready.push_back(Err(AgentError::Network(e)));
                }
                Ok(None) => {
                    let events = state.decoder.finish();
                    state.absorb(events);
                    state.finished = true;
                }
                Err(_) => {
                    state.finished = true;
                    state.ready.push_back(Err(AgentError::Timeout(timeout_secs)));
                }
            }
        }
    });

    Box::pin(fragments)
}
