//! Usage: Authorization redirect URL construction.

use crate::config::Scope;
use crate::error::{StrategyError, StrategyResult};
use reqwest::Url;

pub(crate) fn build_authorization_url(
    authorization_url: &str,
    product_id: &str,
    callback_url: &str,
    scope: Option<&Scope>,
    scope_separator: &str,
    state: Option<&str>,
) -> StrategyResult<String> {
    // The endpoint already passed validation at construction; a parse
    // failure here still must not panic.
    let mut url = Url::parse(authorization_url).map_err(|e| StrategyError::InvalidOption {
        field: "authorization_url",
        message: e.to_string(),
    })?;

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("prod_id", product_id);
        pairs.append_pair("redirect_uri", callback_url);
        if let Some(scope) = scope {
            pairs.append_pair("scope", &scope.join(scope_separator));
        }
        if let Some(state) = state {
            pairs.append_pair("state", state);
        }
    }

    Ok(url.into())
}
