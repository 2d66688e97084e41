//! Events produced by the stream decoder

use super::record::{TimingBreakdown, Usage};
use crate::pipeline::DecodeError;

/// One decoded unit of a streamed completion.
///
/// A single data line can yield several events (e.g. a final chunk carrying both
/// the last delta and the usage counters).
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Partial generated text
    Delta(String),

    /// Token counters carried by a chunk (usually the last one)
    Usage(Usage),

    /// Server-side timing carried by a chunk (usually the last one)
    Timing(TimingBreakdown),

    /// The end sentinel was seen
    Done,

    /// A payload could not be parsed; nothing after it is processed
    Failed(DecodeError),
}

impl StreamEvent {
    pub fn as_delta(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) => Some(s),
            _ => None,
        }
    }
}
