//! 批量调度模块：以固定数量的工作线程执行整批请求并汇总结果。
//!
//! # Batch Dispatch Module
//!
//! Runs a whole batch of requests with bounded concurrency and reduces the
//! per-request records into run totals.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Dispatcher`] | Fixed worker pool over a shared atomic cursor |
//! | [`DispatchConfig`] | Worker count |
//! | [`reduce`] | Folds completion records into an [`AggregateReport`](crate::types::AggregateReport) |
//!
//! ## Example
//!
//! ```rust
//! use ai_throughput_bench::batch::Dispatcher;
//!
//! let prompts = vec!["a", "bb", "ccc"];
//! let lengths = Dispatcher::new(2).run(&prompts, |p| p.len()).unwrap();
//! assert_eq!(lengths, vec![1, 2, 3]);
//! ```
//!
//! ## Ordering
//!
//! Results are stored by input index, never by completion order, so
//! `results[i]` always belongs to `items[i]`.

mod aggregate;
mod dispatch;

pub use aggregate::reduce;
pub use dispatch::{run, DispatchConfig, Dispatcher};
