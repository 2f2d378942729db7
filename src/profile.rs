//! Usage: Authenticated user-profile fetch and normalization.

use crate::error::{StrategyError, StrategyResult, UpstreamStage};
use crate::request::scalar_to_string;
use crate::security::sanitize_body_snippet;
use serde_json::Value;
use std::sync::Arc;

/// Fixed provider name stamped on every normalized profile.
pub const PROVIDER_NAME: &str = "ticketauth";

/// Normalized user identity, with the raw response kept verbatim for
/// application inspection.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Profile {
    pub provider: &'static str,
    /// Provider user identifier (`user_no`), stringified.
    pub id: Option<String>,
    /// Display name (`profile_name`).
    pub display_name: Option<String>,
    /// Raw response body, exactly as received.
    pub raw: String,
    /// Parsed response body.
    pub json: Value,
}

pub(crate) async fn fetch_user_profile(
    client: &reqwest::Client,
    user_profile_url: &str,
    access_token: &str,
) -> StrategyResult<Profile> {
    let response = client
        .get(user_profile_url.trim())
        .header("Authorization", format!("Bearer {access_token}"))
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| StrategyError::upstream_caused(UpstreamStage::Profile, "request failed", e))?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        StrategyError::upstream_caused(UpstreamStage::Profile, "response read failed", e)
    })?;

    if !status.is_success() {
        return Err(StrategyError::upstream(
            UpstreamStage::Profile,
            format!(
                "endpoint returned status={} body={}",
                status.as_u16(),
                sanitize_body_snippet(&body)
            ),
        ));
    }

    parse_profile(body)
}

/// Parse and normalize a profile body. A body that is not valid JSON is the
/// distinct [`StrategyError::ProfileParse`] kind, not an upstream failure.
pub(crate) fn parse_profile(raw: String) -> StrategyResult<Profile> {
    let json: Value = serde_json::from_str(&raw).map_err(|e| StrategyError::ProfileParse {
        source: Arc::new(e),
    })?;

    let id = json
        .get("user_no")
        .and_then(scalar_to_string)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let display_name = json
        .get("profile_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    Ok(Profile {
        provider: PROVIDER_NAME,
        id,
        display_name,
        raw,
        json,
    })
}
