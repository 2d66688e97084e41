//! Request descriptor: one line of the input dataset.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Completion parameters forwarded to the API when present in a descriptor.
///
/// Anything else in the descriptor is kept for the report echo but never sent.
pub const FORWARDED_PARAMS: &[&str] = &[
    "prompt",
    "suffix",
    "max_tokens",
    "temperature",
    "top_p",
    "n",
    "logprobs",
    "echo",
    "stop",
    "presence_penalty",
    "frequency_penalty",
    "best_of",
    "logit_bias",
    "user",
];

/// An immutable, semi-structured request record.
///
/// The dispatch layer treats it as opaque; only the executor looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestDescriptor(Map<String, Value>);

impl RequestDescriptor {
    /// Build a descriptor from an arbitrary JSON value. Only objects qualify.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(map.into()),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Streaming unless the descriptor says `"stream": false`.
    pub fn is_streaming(&self) -> bool {
        self.0.get("stream").and_then(Value::as_bool).unwrap_or(true)
    }

    /// The subset of fields that make up the request body (minus `model`/`stream`,
    /// which the transport owns). Null values are treated as absent.
    pub fn completion_params(&self) -> Map<String, Value> {
        FORWARDED_PARAMS
            .iter()
            .filter_map(|key| match self.0.get(*key) {
                Some(Value::Null) | None => None,
                Some(v) => Some(((*key).to_string(), v.clone())),
            })
            .collect()
    }
}

impl From<Map<String, Value>> for RequestDescriptor {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
