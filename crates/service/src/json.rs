//! Helpers for loosely-typed JSON fields.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a field that is present in the document as `Some`, even when it
/// is `null`. Pair with `#[serde(default)]` so a missing key stays `None`.
pub fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Falsy values are `null`, `false`, `0` and `""`; everything else is truthy.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
