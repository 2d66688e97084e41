//! Per-request completion record.

use super::request::RequestDescriptor;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Token counters as reported by the API. Zero until reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Server-side timing breakdown as reported by the API (`time_info`). Zero until reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingBreakdown {
    pub queue_time: f64,
    pub prompt_time: f64,
    pub completion_time: f64,
    pub total_time: f64,
    /// Provider creation timestamp, seconds since epoch.
    pub created: i64,
}

/// The full outcome and timing of one executed request.
///
/// Created when a worker claims the request and filled in by the executor.
/// `end_time` is set once, at the terminal event; later calls to
/// [`CompletionRecord::finish`] are no-ops.
#[derive(Debug, Clone)]
pub struct CompletionRecord {
    pub input: RequestDescriptor,
    pub output_text: String,
    pub success: bool,
    pub error_message: Option<String>,
    pub start_time: Instant,
    pub first_token_time: Option<Instant>,
    pub end_time: Option<Instant>,
    pub chunk_count: usize,
    pub usage: Usage,
    pub timing: TimingBreakdown,
}

impl CompletionRecord {
    /// A fresh record whose clock starts now.
    pub fn started(input: RequestDescriptor) -> Self {
        Self::started_at(input, Instant::now())
    }

    pub fn started_at(input: RequestDescriptor, start_time: Instant) -> Self {
        Self {
            input,
            output_text: String::new(),
            success: true,
            error_message: None,
            start_time,
            first_token_time: None,
            end_time: None,
            chunk_count: 0,
            usage: Usage::default(),
            timing: TimingBreakdown::default(),
        }
    }

    /// Append generated text observed at `at`.
    ///
    /// The first append that turns `output_text` non-empty stamps `first_token_time`.
    pub fn append_output(&mut self, delta: &str, at: Instant) {
        if delta.is_empty() {
            return;
        }
        let was_empty = self.output_text.is_empty();
        self.output_text.push_str(delta);
        if was_empty && self.first_token_time.is_none() {
            self.first_token_time = Some(at);
        }
    }

    /// Stamp the terminal event. Only the first call has an effect.
    pub fn finish(&mut self, at: Instant) {
        if self.end_time.is_none() {
            self.end_time = Some(at);
        }
    }

    /// Mark the request failed. Keeps an earlier `end_time` if one exists.
    pub fn fail(&mut self, message: impl Into<String>, at: Instant) {
        self.success = false;
        self.error_message = Some(message.into());
        self.finish(at);
    }

    pub fn total_duration(&self) -> Option<Duration> {
        self.end_time
            .map(|end| end.saturating_duration_since(self.start_time))
    }

    /// Time to first token.
    pub fn ttft_duration(&self) -> Option<Duration> {
        self.first_token_time
            .map(|t| t.saturating_duration_since(self.start_time))
    }
}
