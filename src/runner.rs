//! One end-to-end benchmark run over an in-memory batch.

use crate::batch::{self, Dispatcher};
use crate::client::executor::RequestExecutor;
use crate::report::BenchmarkReport;
use crate::types::{AggregateReport, CompletionRecord, RequestDescriptor, RunClock};
use crate::Result;
use std::time::Instant;
use tracing::info;

/// Everything a run produced, in request order.
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    pub clock: RunClock,
    pub report: AggregateReport,
    pub completions: Vec<CompletionRecord>,
}

impl BenchmarkRun {
    pub fn to_report(&self) -> BenchmarkReport {
        BenchmarkReport::new(&self.report, &self.completions, &self.clock)
    }
}

/// Dispatch every request through `executor` with `concurrency` workers.
///
/// The run window brackets the dispatch only; loading and writing are outside it.
pub fn run_benchmark(
    requests: &[RequestDescriptor],
    concurrency: usize,
    executor: &RequestExecutor,
) -> Result<BenchmarkRun> {
    let dispatcher = Dispatcher::new(concurrency);
    info!(
        requests = requests.len(),
        concurrency = dispatcher.config().concurrency,
        model = executor.model(),
        "starting benchmark"
    );

    let clock = RunClock::start();
    let run_start = clock.origin();
    let completions = dispatcher.run(requests, |req| executor.execute(req))?;
    let run_end = Instant::now();

    let report = batch::reduce(&completions, run_start, run_end);
    info!(
        requests = report.total_requests,
        failures = report.total_failures,
        total_tokens = report.total_tokens,
        duration_secs = report.total_duration().as_secs_f64(),
        rps = report.requests_per_second(),
        "benchmark finished"
    );

    Ok(BenchmarkRun {
        clock,
        report,
        completions,
    })
}
