//! Reduction of completion records into run totals.

use crate::types::{AggregateReport, CompletionRecord};
use std::time::Instant;

/// Sum usage and count failures over every record.
///
/// The run window comes from the caller; record timestamps never widen it.
pub fn reduce(records: &[CompletionRecord], run_start: Instant, run_end: Instant) -> AggregateReport {
    let mut report = AggregateReport {
        overall_start: run_start,
        overall_end: run_end,
        total_prompt_tokens: 0,
        total_completion_tokens: 0,
        total_tokens: 0,
        total_requests: records.len(),
        total_failures: 0,
    };

    for record in records {
        report.total_prompt_tokens += record.usage.prompt_tokens;
        report.total_completion_tokens += record.usage.completion_tokens;
        report.total_tokens += record.usage.total_tokens;
        if !record.success {
            report.total_failures += 1;
        }
    }
    report
}
