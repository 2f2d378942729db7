//! Usage: Read-only inbound request snapshot and the bracket-path field locator.

use serde_json::Value;

/// Parsed view of the current request's form body and query parameters.
///
/// The host framework builds one per request; nothing here outlives the
/// authentication attempt.
#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    pub body: Value,
    pub query: Value,
}

impl LoginRequest {
    pub fn new(body: Value, query: Value) -> Self {
        Self { body, query }
    }

    /// Locate a field by bracket path, body first, then query.
    ///
    /// Returns a trimmed non-empty string, stringifying numeric and boolean
    /// scalars the way the wire values may arrive.
    pub(crate) fn field(&self, path: &str) -> Option<String> {
        lookup(&self.body, path)
            .or_else(|| lookup(&self.query, path))
            .and_then(scalar_to_string)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Walk `source` along a bracket-separated path (`a[b][c]` reads key `a`,
/// then `b`, then `c`) and return the first non-container value met.
///
/// `None` when a segment is absent, a value is `null`, or the path never
/// reaches a scalar. Objects and arrays are descended into, never returned.
/// Absent or non-object input is simply "not found".
pub(crate) fn lookup<'a>(source: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = source;
    for segment in path.split('[') {
        let key = segment.trim_end_matches(']');
        if key.is_empty() {
            return None;
        }
        let next = current.get(key)?;
        match next {
            Value::Null => return None,
            Value::Object(_) | Value::Array(_) => current = next,
            _ => return Some(next),
        }
    }
    None
}

/// Lossy scalar-to-string coercion: strings verbatim, numbers and booleans
/// via display. Containers and `null` are not scalars.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
