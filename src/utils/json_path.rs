//! Dot-notation path access into JSON documents.
//!
//! Supports nested keys (`usage.total_tokens`), dot-index segments
//! (`choices.0.text`) and bracket indexing (`choices[0].delta.content`).

use serde_json::Value;

/// Read-only path mapper over `serde_json::Value`.
pub struct PathMapper;

impl PathMapper {
    /// Get value from JSON using dot-notation path (supports array indexing)
    ///
    /// Examples:
    /// - "choices[0].delta.content"
    /// - "choices.0.text"
    /// - "time_info.queue_time"
    pub fn get_path<'a>(obj: &'a Value, path: &str) -> Option<&'a Value> {
        let normalized = path.trim().trim_start_matches("$.");
        if normalized.is_empty() {
            return None;
        }

        let mut current = obj;
        for part in normalized.split('.') {
            if part.is_empty() {
                return None;
            }

            if let Some(bracket_pos) = part.find('[') {
                let key = &part[..bracket_pos];
                let idx_str = part[bracket_pos + 1..].trim_end_matches(']');
                if !key.is_empty() {
                    current = current.as_object()?.get(key)?;
                }
                let idx = idx_str.parse::<usize>().ok()?;
                current = current.as_array()?.get(idx)?;
            } else {
                current = match current {
                    Value::Object(map) => map.get(part)?,
                    Value::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
                    _ => return None,
                };
            }
        }

        Some(current)
    }

    /// String at `path`; `None` for missing, null or non-string values.
    pub fn get_str<'a>(obj: &'a Value, path: &str) -> Option<&'a str> {
        Self::get_path(obj, path).and_then(Value::as_str)
    }

    /// Unsigned integer at `path`, or `default` when absent or mistyped.
    pub fn get_u64_or(obj: &Value, path: &str, default: u64) -> u64 {
        Self::get_path(obj, path)
            .and_then(Value::as_u64)
            .unwrap_or(default)
    }

    /// Signed integer at `path`, or `default` when absent or mistyped.
    pub fn get_i64_or(obj: &Value, path: &str, default: i64) -> i64 {
        Self::get_path(obj, path)
            .and_then(Value::as_i64)
            .unwrap_or(default)
    }

    /// Float at `path` (integers widen), or `default` when absent or mistyped.
    pub fn get_f64_or(obj: &Value, path: &str, default: f64) -> f64 {
        Self::get_path(obj, path)
            .and_then(Value::as_f64)
            .unwrap_or(default)
    }
}
