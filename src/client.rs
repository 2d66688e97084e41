//! Request execution against the completion API.
//!
//! The executor owns the per-request protocol (streaming or not, timing,
//! failure capture); the wire itself sits behind [`crate::transport::Transport`].

pub mod executor;

pub use executor::RequestExecutor;
