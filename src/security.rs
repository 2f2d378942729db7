//! Usage: Token masking and upstream-body redaction for logs and error text.

use serde_json::Value;

const TOKEN_MASK_PREFIX_LEN: usize = 6;
const TOKEN_MASK_SUFFIX_LEN: usize = 4;
const BODY_SNIPPET_LIMIT: usize = 500;

pub(crate) fn mask_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    // Counted in chars, not bytes: masked values come from request fields
    // and upstream bodies, which are not guaranteed to be ASCII.
    let len = trimmed.chars().count();
    if len <= TOKEN_MASK_PREFIX_LEN + TOKEN_MASK_SUFFIX_LEN {
        return "*".repeat(len.min(8));
    }

    let prefix: String = trimmed.chars().take(TOKEN_MASK_PREFIX_LEN).collect();
    let suffix: String = trimmed.chars().skip(len - TOKEN_MASK_SUFFIX_LEN).collect();
    format!("{prefix}...{suffix}")
}

fn is_sensitive_key(key: &str) -> bool {
    let key_lc = key.trim().to_ascii_lowercase();
    key_lc.contains("token")
        || key_lc.contains("secret")
        || key_lc.contains("ticket")
        || key_lc.contains("pw")
        || key_lc == "authorization"
}

fn redact_sensitive_json_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                if is_sensitive_key(key) {
                    if let Some(raw) = nested.as_str() {
                        *nested = Value::String(mask_token(raw));
                        continue;
                    }
                }
                redact_sensitive_json_fields(nested);
            }
        }
        Value::Array(items) => {
            for nested in items {
                redact_sensitive_json_fields(nested);
            }
        }
        _ => {}
    }
}

/// Redacted, truncated view of an upstream error body, safe to embed in
/// error messages and logs.
pub(crate) fn sanitize_body_snippet(body: &str) -> String {
    if let Ok(mut value) = serde_json::from_str::<Value>(body) {
        redact_sensitive_json_fields(&mut value);
        if let Ok(encoded) = serde_json::to_string(&value) {
            return encoded.chars().take(BODY_SNIPPET_LIMIT).collect();
        }
    }
    body.chars().take(BODY_SNIPPET_LIMIT).collect()
}
