//! # ai-throughput-bench
//!
//! 面向文本补全 API 的并发吞吐量基准测试工具，支持流式与非流式请求。
//!
//! Concurrent load-testing harness for a text-completion inference API. It
//! replays a JSONL batch of requests with a fixed number of workers, measures
//! per-request latency and time to first token, and writes one JSON report.
//!
//! ## Overview
//!
//! ```text
//! JSONL ─► dataset ─► batch::Dispatcher ─► client::RequestExecutor ─► Transport
//!                            │                      │
//!                     results[i] slots      pipeline::StreamDecoder
//!                            │
//!                    batch::reduce ─► report::BenchmarkReport ─► file
//! ```
//!
//! - **Bounded concurrency**: exactly N workers share an atomic cursor over the batch
//! - **Index correlation**: `completions[i]` always belongs to `requests[i]`
//! - **Streaming-first**: SSE bodies are decoded incrementally, chunk by chunk
//! - **Failure capture**: a failed request becomes a record, never a run error
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_throughput_bench::{
//!     client::RequestExecutor, config::HttpSettings, dataset, runner, transport::HttpTransport,
//! };
//! use std::sync::Arc;
//!
//! fn main() -> ai_throughput_bench::Result<()> {
//!     let requests = dataset::load_requests("requests.jsonl")?;
//!     let transport = HttpTransport::new(
//!         "https://api.cerebras.ai/v1",
//!         Some("your-api-key".to_string()),
//!         &HttpSettings::default(),
//!     )?;
//!     let executor = RequestExecutor::new(Arc::new(transport), "llama-3.3-70b");
//!
//!     let run = runner::run_benchmark(&requests, 10, &executor)?;
//!     run.to_report().write_to_file("throughput_stats.json")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Requests, completion records, aggregate report |
//! | [`batch`] | Worker pool dispatch and aggregation |
//! | [`client`] | Single-request execution |
//! | [`pipeline`] | SSE stream decoding |
//! | [`transport`] | Blocking HTTP transport |
//! | [`dataset`] | JSONL loading and dataset conversion |
//! | [`report`] | JSON report sink |
//! | [`runner`] | End-to-end run |
//! | [`config`] | Run configuration |

pub mod batch;
pub mod client;
pub mod config;
pub mod dataset;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use batch::{DispatchConfig, Dispatcher};
pub use client::RequestExecutor;
pub use config::BenchConfig;
pub use report::BenchmarkReport;
pub use runner::{run_benchmark, BenchmarkRun};
pub use types::{AggregateReport, CompletionRecord, RequestDescriptor};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
