//! 类型系统模块：定义基准测试的请求、结果与汇总数据类型。
//!
//! # Types Module
//!
//! Core data model of the harness: what goes in (one request per JSONL line),
//! what comes out per request, and the run-level reduction.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RequestDescriptor`] | One opaque unit of work, echoed back for correlation |
//! | [`CompletionRecord`] | Outcome and timing of one executed request |
//! | [`Usage`] | Provider-reported token counters |
//! | [`TimingBreakdown`] | Provider-reported server-side timing |
//! | [`AggregateReport`] | Batch-level totals plus the run window |
//! | [`StreamEvent`] | Decoded unit emitted by the stream decoder |
//! | [`RunClock`] | Anchors monotonic instants to wall-clock time |
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`request`] | Request descriptor and wire-parameter extraction |
//! | [`record`] | Per-request completion record |
//! | [`report`] | Aggregate report |
//! | [`events`] | Stream decoder events |
//! | [`clock`] | Monotonic-to-epoch conversion |

pub mod clock;
pub mod events;
pub mod record;
pub mod report;
pub mod request;

pub use clock::RunClock;
pub use events::StreamEvent;
pub use record::{CompletionRecord, TimingBreakdown, Usage};
pub use report::AggregateReport;
pub use request::RequestDescriptor;
