//! Usage: Strategy configuration surface, defaults, and the option validator.

use crate::error::{StrategyError, StrategyResult};
use reqwest::Url;

pub(crate) const DEFAULT_USERNAME_FIELD: &str = "user_id";
pub(crate) const DEFAULT_PASSWORD_FIELD: &str = "user_pw";
pub(crate) const DEFAULT_TICKET_FIELD: &str = "ticket";
pub(crate) const DEFAULT_SCOPE_SEPARATOR: &str = " ";

/// Requested scope: a single value is passed through unchanged, a list is
/// joined with the configured separator when the redirect URL is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Single(String),
    List(Vec<String>),
}

impl Scope {
    pub(crate) fn join(&self, separator: &str) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::List(values) => values.join(separator),
        }
    }
}

/// Constructor input for [`Strategy::new`](crate::Strategy::new).
///
/// `authorization_url`, `token_url`, `product_id`, and `client_secret` are
/// required; everything else is optional with the defaults documented on
/// each field. Application hooks (verify callback, skip-profile predicate,
/// ticket-acquisition callback) attach on the strategy itself.
#[derive(Debug, Clone, Default)]
pub struct StrategyConfig {
    /// Provider authorization endpoint (required).
    pub authorization_url: Option<String>,
    /// Provider token endpoint (required).
    pub token_url: Option<String>,
    /// Product/client identifier issued by the provider (required).
    pub product_id: Option<String>,
    /// Client secret issued by the provider (required).
    pub client_secret: Option<String>,
    /// Ticket endpoint for login-form mode.
    pub ticket_url: Option<String>,
    /// Profile endpoint; without it no profile is loaded.
    pub user_profile_url: Option<String>,
    /// Redirect target registered with the provider; enables redirect mode.
    pub callback_url: Option<String>,
    /// Request field holding the username (default `user_id`).
    pub username_field: Option<String>,
    /// Request field holding the password (default `user_pw`).
    pub password_field: Option<String>,
    /// Request field holding an inbound ticket (default `ticket`).
    pub ticket_field: Option<String>,
    /// Scope forwarded on the authorization redirect.
    pub scope: Option<Scope>,
    /// Separator for joined scope lists (default a single space).
    pub scope_separator: Option<String>,
    /// Opaque state forwarded on the authorization redirect.
    pub state: Option<String>,
}

/// Validated options with defaults filled in.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedOptions {
    pub(crate) authorization_url: String,
    pub(crate) token_url: String,
    pub(crate) product_id: String,
    pub(crate) client_secret: String,
    pub(crate) ticket_url: Option<String>,
    pub(crate) user_profile_url: Option<String>,
    pub(crate) callback_url: Option<String>,
    pub(crate) username_field: String,
    pub(crate) password_field: String,
    pub(crate) ticket_field: String,
    pub(crate) scope: Option<Scope>,
    pub(crate) scope_separator: String,
    pub(crate) state: Option<String>,
}

impl StrategyConfig {
    /// Check required options in their fixed order, validate URL shape, and
    /// apply defaults. Fails on the first missing required field.
    pub(crate) fn validate(self) -> StrategyResult<ResolvedOptions> {
        let authorization_url = required(self.authorization_url, "authorization_url")?;
        let token_url = required(self.token_url, "token_url")?;
        let product_id = required(self.product_id, "product_id")?;
        let client_secret = required(self.client_secret, "client_secret")?;

        valid_url(&authorization_url, "authorization_url")?;
        valid_url(&token_url, "token_url")?;

        let ticket_url = optional(self.ticket_url);
        let user_profile_url = optional(self.user_profile_url);
        let callback_url = optional(self.callback_url);
        if let Some(url) = ticket_url.as_deref() {
            valid_url(url, "ticket_url")?;
        }
        if let Some(url) = user_profile_url.as_deref() {
            valid_url(url, "user_profile_url")?;
        }
        if let Some(url) = callback_url.as_deref() {
            valid_url(url, "callback_url")?;
        }

        Ok(ResolvedOptions {
            authorization_url,
            token_url,
            product_id,
            client_secret,
            ticket_url,
            user_profile_url,
            callback_url,
            username_field: optional(self.username_field)
                .unwrap_or_else(|| DEFAULT_USERNAME_FIELD.to_string()),
            password_field: optional(self.password_field)
                .unwrap_or_else(|| DEFAULT_PASSWORD_FIELD.to_string()),
            ticket_field: optional(self.ticket_field)
                .unwrap_or_else(|| DEFAULT_TICKET_FIELD.to_string()),
            scope: self.scope,
            scope_separator: optional(self.scope_separator)
                .unwrap_or_else(|| DEFAULT_SCOPE_SEPARATOR.to_string()),
            state: optional(self.state),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> StrategyResult<String> {
    optional(value).ok_or(StrategyError::MissingOption { field })
}

/// Blank strings count as unset.
fn optional(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn valid_url(value: &str, field: &'static str) -> StrategyResult<()> {
    Url::parse(value).map_err(|e| StrategyError::InvalidOption {
        field,
        message: e.to_string(),
    })?;
    Ok(())
}
