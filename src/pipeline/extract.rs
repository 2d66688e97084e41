//! Field extraction shared by the streaming decoder and the non-streaming path.
//!
//! Both response shapes of an OpenAI-compatible completions API are accepted:
//! incremental `choices[0].delta.content` and direct `choices[0].text`.

use crate::types::{TimingBreakdown, Usage};
use crate::utils::PathMapper;
use serde_json::Value;

/// Content carried by one streamed chunk.
///
/// When the first choice has a `delta` object, only `delta.content` counts (a
/// role-only delta yields nothing). Otherwise `text` is used.
pub fn content_delta(chunk: &Value) -> Option<&str> {
    let choice = PathMapper::get_path(chunk, "choices.0")?;
    if choice.get("delta").is_some() {
        PathMapper::get_str(choice, "delta.content")
    } else {
        PathMapper::get_str(choice, "text")
    }
}

/// Generated text of a non-streaming response body.
///
/// Returns `None` only when the body has no `choices` to look at; callers then
/// fall back to the raw response content. A choice without text yields `""`.
pub fn completion_text(body: &Value) -> Option<&str> {
    let choice = PathMapper::get_path(body, "choices.0")?;
    Some(
        PathMapper::get_str(choice, "text")
            .or_else(|| PathMapper::get_str(choice, "message.content"))
            .unwrap_or_default(),
    )
}

/// Token counters, when the document carries a `usage` object.
pub fn usage(doc: &Value) -> Option<Usage> {
    let u = doc.get("usage").filter(|u| u.is_object())?;
    Some(Usage {
        prompt_tokens: PathMapper::get_u64_or(u, "prompt_tokens", 0),
        completion_tokens: PathMapper::get_u64_or(u, "completion_tokens", 0),
        total_tokens: PathMapper::get_u64_or(u, "total_tokens", 0),
    })
}

/// Server timing, when the document carries a `time_info` object.
pub fn timing(doc: &Value) -> Option<TimingBreakdown> {
    let t = doc.get("time_info").filter(|t| t.is_object())?;
    Some(TimingBreakdown {
        queue_time: PathMapper::get_f64_or(t, "queue_time", 0.0),
        prompt_time: PathMapper::get_f64_or(t, "prompt_time", 0.0),
        completion_time: PathMapper::get_f64_or(t, "completion_time", 0.0),
        total_time: PathMapper::get_f64_or(t, "total_time", 0.0),
        created: PathMapper::get_i64_or(t, "created", 0),
    })
}
