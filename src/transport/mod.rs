//! 传输层：对补全 API 的阻塞式与流式调用抽象。
//!
//! # Transport Layer
//!
//! The executor talks to the API only through the [`Transport`] trait, one
//! operation per mode. [`HttpTransport`] is the production implementation;
//! tests plug in scripted transports.
//!
//! Both operations are blocking: each worker thread owns its in-flight call
//! for the whole request, and the call's connection is released before the
//! method returns.

pub mod http;

pub use http::HttpTransport;

use crate::Result;
use serde_json::{Map, Value};

/// Body of a completed non-streaming call.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockingCompletion {
    /// Raw response body text
    pub content: String,
    /// The body parsed as JSON, when it is JSON
    pub body: Option<Value>,
}

impl BlockingCompletion {
    pub fn from_text(content: impl Into<String>) -> Self {
        let content = content.into();
        let body = serde_json::from_str(&content).ok();
        Self { content, body }
    }
}

/// Callback receiving raw streamed bytes; return `false` to stop the stream early.
pub type ChunkHandler<'a> = dyn FnMut(&[u8]) -> bool + 'a;

/// Collaborator that performs completion calls.
pub trait Transport: Send + Sync {
    /// One request, one fully buffered response.
    fn complete_blocking(
        &self,
        model: &str,
        params: &Map<String, Value>,
    ) -> Result<BlockingCompletion>;

    /// Stream the response body into `on_chunk` until the server closes the
    /// stream or the handler returns `false`.
    fn complete_streaming(
        &self,
        model: &str,
        params: &Map<String, Value>,
        on_chunk: &mut ChunkHandler<'_>,
    ) -> Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response body read failed: {0}")]
    Body(#[source] std::io::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
