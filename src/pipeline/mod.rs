//! 流式解码模块：将原始 SSE 字节流解析为内容增量与元数据事件。
//!
//! # Streaming Decode Layer
//!
//! Turns the raw bytes of a streamed completion into
//! [`StreamEvent`](crate::types::StreamEvent)s. Decoding
//! is kept apart from accumulation: the decoder knows nothing about clocks,
//! transports or records, so it can be driven chunk by chunk from a transport
//! callback or directly from a test.
//!
//! ## Stages
//!
//! ```text
//! Raw Bytes → line framing → `data:` payload → JSON → StreamEvent
//!                 │                 │                    │
//!            split on \n       sentinel check      Delta, Usage,
//!            across chunks     ([DONE] → Done)     Timing, Done, Failed
//! ```
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`StreamDecoder`] | Incremental state machine with a `feed` method |
//! | [`DecoderState`] | `Accumulating`, `Done` or `Failed` |
//! | [`FeedOutcome`] | Events produced by one `feed` call plus the terminal flag |
//! | [`decode_payload`] | Pure function over one event payload |
//! | [`extract`] | Content / usage / timing extraction helpers |
//!
//! ## Example
//!
//! ```rust
//! use ai_throughput_bench::pipeline::StreamDecoder;
//!
//! let mut decoder = StreamDecoder::new();
//! let out = decoder.feed(b"data: {\"choices\":[{\"text\":\"Hi\"}]}\n\ndata: [DONE]\n\n");
//! assert!(out.terminal);
//! assert_eq!(decoder.chunk_count(), 1);
//! ```

pub mod decode;
pub mod extract;


pub use decode::{decode_payload, DecoderState, FeedOutcome, StreamDecoder};

/// Decode failure for a single event payload.
///
/// Cloneable so it can travel inside a [`crate::types::StreamEvent`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed event payload: {reason} (payload: {payload})")]
    MalformedPayload { reason: String, payload: String },
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>, payload: &str) -> Self {
        // Keep error messages bounded; chunks can be large.
        const MAX_ECHO: usize = 200;
        let payload = if payload.len() > MAX_ECHO {
            let mut cut = MAX_ECHO;
            while !payload.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}…", &payload[..cut])
        } else {
            payload.to_string()
        };
        DecodeError::MalformedPayload {
            reason: reason.into(),
            payload,
        }
    }
}
