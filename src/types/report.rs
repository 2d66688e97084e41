//! Batch-level reduction of all completion records.

use std::time::{Duration, Instant};

/// Totals for one run plus the run's own wall-clock window.
///
/// `overall_start`/`overall_end` bracket the whole dispatch; they are never
/// derived from individual records.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    pub overall_start: Instant,
    pub overall_end: Instant,
    pub total_prompt_tokens: u64,
    pub total_completion_tokens: u64,
    /// Summed as reported; not assumed to equal prompt + completion.
    pub total_tokens: u64,
    pub total_requests: usize,
    pub total_failures: usize,
}

impl AggregateReport {
    pub fn total_duration(&self) -> Duration {
        self.overall_end.saturating_duration_since(self.overall_start)
    }

    /// Requests per second over the run window; 0 for an empty window.
    pub fn requests_per_second(&self) -> f64 {
        let secs = self.total_duration().as_secs_f64();
        if secs > 0.0 {
            self.total_requests as f64 / secs
        } else {
            0.0
        }
    }

    pub fn total_successes(&self) -> usize {
        self.total_requests.saturating_sub(self.total_failures)
    }
}
