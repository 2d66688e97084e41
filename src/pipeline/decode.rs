//! Incremental SSE decoder (bytes -> StreamEvent)
//!
//! Framing: each logical event is a line `data: <json>`; events are separated by
//! blank lines; the payload `[DONE]` ends the stream. Other SSE fields (`event:`,
//! `id:`, `retry:`, `: comment`) are skipped.

use super::{extract, DecodeError};
use crate::types::StreamEvent;
use serde_json::Value;

/// Decoder lifecycle. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Accumulating,
    Done,
    Failed,
}

/// Result of feeding one raw chunk.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedOutcome {
    /// Events decoded from every complete line in this chunk, in arrival order
    pub events: Vec<StreamEvent>,
    /// The decoder reached `Done` or `Failed`; the caller should stop reading
    pub terminal: bool,
}

/// Stateful SSE decoder.
///
/// Bytes are buffered until a full line is available, so a line split across
/// transport chunks (including inside a multi-byte character) decodes the same
/// as if it had arrived whole.
#[derive(Debug)]
pub struct StreamDecoder {
    prefix: String,
    done_signal: String,
    buf: Vec<u8>,
    /// Prefix of `buf` already known to contain no newline
    scanned: usize,
    state: DecoderState,
    chunks: usize,
}

impl StreamDecoder {
    /// Decoder with the standard `data:` marker and `[DONE]` sentinel.
    pub fn new() -> Self {
        Self::with_markers(None, None)
    }

    pub fn with_markers(prefix: Option<String>, done_signal: Option<String>) -> Self {
        Self {
            prefix: prefix.unwrap_or_else(|| "data:".to_string()),
            done_signal: done_signal.unwrap_or_else(|| "[DONE]".to_string()),
            buf: Vec::new(),
            scanned: 0,
            state: DecoderState::Accumulating,
            chunks: 0,
        }
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state != DecoderState::Accumulating
    }

    /// Number of data lines successfully processed so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Consume one raw chunk from the transport.
    pub fn feed(&mut self, bytes: &[u8]) -> FeedOutcome {
        if self.is_terminal() {
            return self.outcome(Vec::new());
        }

        let mut buf = std::mem::take(&mut self.buf);
        buf.extend_from_slice(bytes);
        let mut events = Vec::new();

        // Only bytes added since the last feed can hold a new line break.
        let mut line_start = 0;
        let mut search_from = self.scanned;
        while let Some(offset) = buf[search_from..].iter().position(|b| *b == b'\n') {
            let end = search_from + offset;
            self.process_line(&buf[line_start..end], &mut events);
            line_start = end + 1;
            search_from = line_start;
            if self.is_terminal() {
                break;
            }
        }

        if self.is_terminal() {
            buf.clear();
        } else {
            buf.drain(..line_start);
        }
        self.scanned = buf.len();
        self.buf = buf;
        self.outcome(events)
    }

    /// Flush a trailing line that was not newline-terminated (end of input).
    pub fn finish(&mut self) -> FeedOutcome {
        if self.is_terminal() || self.buf.is_empty() {
            return self.outcome(Vec::new());
        }
        let line = std::mem::take(&mut self.buf);
        self.scanned = 0;
        let mut events = Vec::new();
        self.process_line(&line, &mut events);
        self.outcome(events)
    }

    fn outcome(&self, events: Vec<StreamEvent>) -> FeedOutcome {
        FeedOutcome {
            events,
            terminal: self.is_terminal(),
        }
    }

    fn process_line(&mut self, raw: &[u8], events: &mut Vec<StreamEvent>) {
        let line = trim_ascii(raw);
        if line.is_empty() {
            return;
        }

        // Non-data SSE fields and comments carry nothing we measure.
        let Some(payload) = line.strip_prefix(self.prefix.as_bytes()) else {
            return;
        };
        let payload = trim_ascii(payload);

        if payload == self.done_signal.as_bytes() {
            self.state = DecoderState::Done;
            events.push(StreamEvent::Done);
            return;
        }
        if payload.is_empty() {
            return;
        }

        let decoded = std::str::from_utf8(payload)
            .map_err(|e| {
                DecodeError::malformed(
                    format!("invalid UTF-8: {}", e),
                    &String::from_utf8_lossy(payload),
                )
            })
            .and_then(decode_payload);

        match decoded {
            Ok(decoded) => {
                self.chunks += 1;
                events.extend(decoded);
            }
            Err(err) => {
                tracing::debug!(error = %err, "stream payload rejected");
                self.state = DecoderState::Failed;
                events.push(StreamEvent::Failed(err));
            }
        }
    }
}

fn trim_ascii(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if !first.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    while let [rest @ .., last] = bytes {
        if !last.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    bytes
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode one event payload into content and metadata events.
///
/// Content and metadata are independent: a chunk may carry either, both or
/// neither. An empty delta produces no `Delta` event.
pub fn decode_payload(payload: &str) -> Result<Vec<StreamEvent>, DecodeError> {
    let chunk: Value = serde_json::from_str(payload)
        .map_err(|e| DecodeError::malformed(e.to_string(), payload))?;

    let mut events = Vec::new();
    if let Some(delta) = extract::content_delta(&chunk).filter(|d| !d.is_empty()) {
        events.push(StreamEvent::Delta(delta.to_string()));
    }
    if let Some(usage) = extract::usage(&chunk) {
        events.push(StreamEvent::Usage(usage));
    }
    if let Some(timing) = extract::timing(&chunk) {
        events.push(StreamEvent::Timing(timing));
    }
    Ok(events)
}
