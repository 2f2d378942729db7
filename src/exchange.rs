//! Usage: Ticket-exchange and token-exchange wire calls (form POST + JSON body).

use crate::error::{StrategyError, StrategyResult, UpstreamStage};
use crate::request::scalar_to_string;
use crate::security::sanitize_body_snippet;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Result of the ticket exchange: the opaque ticket plus the entire parsed
/// response, forwarded as auxiliary parameters.
#[derive(Debug, Clone)]
pub(crate) struct TicketGrant {
    pub(crate) ticket: String,
    pub(crate) params: Map<String, Value>,
}

/// Result of the token exchange. `refresh_token` has already been removed
/// from `params`; the `token` key itself stays.
#[derive(Debug, Clone)]
pub(crate) struct TokenBundle {
    pub(crate) access_token: String,
    pub(crate) refresh_token: Option<String>,
    pub(crate) params: Map<String, Value>,
}

/// POST `user_id`/`user_pw`/`product_id` to the ticket endpoint.
pub(crate) async fn fetch_ticket(
    client: &reqwest::Client,
    ticket_url: &str,
    user_id: &str,
    user_pw: &str,
    product_id: &str,
) -> StrategyResult<TicketGrant> {
    let mut form: HashMap<&str, String> = HashMap::new();
    form.insert("user_id", user_id.trim().to_string());
    form.insert("user_pw", user_pw.to_string());
    form.insert("product_id", product_id.trim().to_string());

    let body = send_form(client, ticket_url, &form, UpstreamStage::Ticket).await?;
    parse_ticket_body(&body)
}

/// POST `ticket`/`secret_key`/`product_id` to the token endpoint.
pub(crate) async fn exchange_token(
    client: &reqwest::Client,
    token_url: &str,
    ticket: &str,
    client_secret: &str,
    product_id: &str,
) -> StrategyResult<TokenBundle> {
    let mut form: HashMap<&str, String> = HashMap::new();
    form.insert("ticket", ticket.trim().to_string());
    form.insert("secret_key", client_secret.trim().to_string());
    form.insert("product_id", product_id.trim().to_string());

    let body = send_form(client, token_url, &form, UpstreamStage::Token).await?;
    parse_token_body(&body)
}

async fn send_form(
    client: &reqwest::Client,
    url: &str,
    form: &HashMap<&str, String>,
    stage: UpstreamStage,
) -> StrategyResult<String> {
    let response = client
        .post(url.trim())
        .form(form)
        .send()
        .await
        .map_err(|e| StrategyError::upstream_caused(stage, "request failed", e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| StrategyError::upstream_caused(stage, "response read failed", e))?;

    if !status.is_success() {
        return Err(StrategyError::upstream(
            stage,
            format!(
                "endpoint returned status={} body={}",
                status.as_u16(),
                sanitize_body_snippet(&body)
            ),
        ));
    }

    Ok(body)
}

pub(crate) fn parse_ticket_body(body: &str) -> StrategyResult<TicketGrant> {
    let params = parse_object_body(body, UpstreamStage::Ticket)?;
    let ticket = required_field(&params, "ticket", UpstreamStage::Ticket)?;
    Ok(TicketGrant { ticket, params })
}

pub(crate) fn parse_token_body(body: &str) -> StrategyResult<TokenBundle> {
    let mut params = parse_object_body(body, UpstreamStage::Token)?;
    let access_token = required_field(&params, "token", UpstreamStage::Token)?;
    let refresh_token = params
        .remove("refresh_token")
        .as_ref()
        .and_then(scalar_to_string)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    Ok(TokenBundle {
        access_token,
        refresh_token,
        params,
    })
}

fn parse_object_body(body: &str, stage: UpstreamStage) -> StrategyResult<Map<String, Value>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| StrategyError::upstream_caused(stage, "response json invalid", e))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StrategyError::upstream(
            stage,
            "response is not a json object",
        )),
    }
}

fn required_field(
    params: &Map<String, Value>,
    key: &str,
    stage: UpstreamStage,
) -> StrategyResult<String> {
    params
        .get(key)
        .and_then(scalar_to_string)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StrategyError::upstream(stage, format!("response missing `{key}`")))
}
