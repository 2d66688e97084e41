//! 报告输出：将运行结果序列化为 JSON 报告。
//!
//! # Report Sink
//!
//! Serializes one benchmark run as
//!
//! ```json
//! { "overall_stats": { ... }, "completions": [ ... ] }
//! ```
//!
//! pretty-printed with four-space indentation. Timestamps are seconds since
//! the Unix epoch, converted through the run's [`RunClock`]; durations are
//! seconds. Per-completion timestamps that were never observed are omitted.

use crate::types::{AggregateReport, CompletionRecord, RunClock, TimingBreakdown, Usage};
use crate::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{error, info};

#[derive(Debug, Clone, Serialize)]
pub struct OverallStats {
    pub total_duration_seconds: f64,
    pub total_prompt_tokens: u64,
    pub total_completion_tokens: u64,
    pub total_tokens: u64,
    pub total_number_requests: usize,
    pub total_number_failures: usize,
    pub requests_per_second: f64,
    pub start_time: f64,
    pub end_time: f64,
}

impl OverallStats {
    pub fn new(report: &AggregateReport, clock: &RunClock) -> Self {
        Self {
            total_duration_seconds: report.total_duration().as_secs_f64(),
            total_prompt_tokens: report.total_prompt_tokens,
            total_completion_tokens: report.total_completion_tokens,
            total_tokens: report.total_tokens,
            total_number_requests: report.total_requests,
            total_number_failures: report.total_failures,
            requests_per_second: report.requests_per_second(),
            start_time: clock.epoch_seconds(report.overall_start),
            end_time: clock.epoch_seconds(report.overall_end),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionEntry {
    pub input: Value,
    pub output_text: String,
    pub success: bool,
    pub error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttft_duration_seconds: Option<f64>,
    pub number_of_chunks: usize,
    pub start_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttft_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    pub api_usage: Usage,
    pub api_time_info: TimingBreakdown,
}

impl CompletionEntry {
    pub fn new(record: &CompletionRecord, clock: &RunClock) -> Self {
        Self {
            input: Value::Object(record.input.fields().clone()),
            output_text: record.output_text.clone(),
            success: record.success,
            error_message: record.error_message.clone().unwrap_or_default(),
            total_duration_seconds: record.total_duration().map(|d| d.as_secs_f64()),
            ttft_duration_seconds: record.ttft_duration().map(|d| d.as_secs_f64()),
            number_of_chunks: record.chunk_count,
            start_time: clock.epoch_seconds(record.start_time),
            ttft_time: record.first_token_time.map(|t| clock.epoch_seconds(t)),
            end_time: record.end_time.map(|t| clock.epoch_seconds(t)),
            api_usage: record.usage,
            api_time_info: record.timing,
        }
    }
}

/// The persisted form of one run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub overall_stats: OverallStats,
    pub completions: Vec<CompletionEntry>,
}

impl BenchmarkReport {
    pub fn new(report: &AggregateReport, records: &[CompletionRecord], clock: &RunClock) -> Self {
        Self {
            overall_stats: OverallStats::new(report, clock),
            completions: records
                .iter()
                .map(|r| CompletionEntry::new(r, clock))
                .collect(),
        }
    }

    pub fn write_pretty<W: Write>(&self, writer: W) -> Result<()> {
        let mut ser =
            serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_pretty(&mut buf)?;
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the report to `path`, replacing any existing file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let result = self.write_file(path);
        match &result {
            Ok(()) => info!(
                path = %path.display(),
                completions = self.completions.len(),
                "report written"
            ),
            Err(e) => error!(path = %path.display(), error = %e, "failed to write report"),
        }
        result
    }

    fn write_file(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_pretty(&mut writer)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
