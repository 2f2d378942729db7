//! Usage: The login strategy: per-request flow dispatch, the token/profile
//! fetch chain, and verify-callback dispatch.

use crate::authorize::build_authorization_url;
use crate::callbacks::{GetTicket, Params, SkipUserProfile, Verify};
use crate::config::{ResolvedOptions, StrategyConfig};
use crate::error::{StrategyError, StrategyResult};
use crate::exchange::{self, TokenBundle};
use crate::outcome::{Outcome, OutcomeSink, Verdict};
use crate::profile::{self, Profile};
use crate::request::LoginRequest;
use crate::security::mask_token;
use serde_json::json;
use std::future::Future;

/// One configured login strategy. Read-only after construction; independent
/// requests may run against it concurrently.
pub struct Strategy {
    client: reqwest::Client,
    options: ResolvedOptions,
    verify: Verify,
    skip_user_profile: SkipUserProfile,
    get_ticket: Option<GetTicket>,
}

impl Strategy {
    /// Validate the configuration and build the strategy.
    ///
    /// Fails synchronously naming the first missing required option, in the
    /// fixed order `authorization_url`, `token_url`, `product_id`,
    /// `client_secret`. An HTTP client that cannot be built is an error
    /// too, never a panic.
    pub fn new(config: StrategyConfig, verify: Verify) -> StrategyResult<Self> {
        let options = config.validate()?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StrategyError::HttpClient {
                source: std::sync::Arc::new(e),
            })?;
        Ok(Self {
            client,
            options,
            verify,
            skip_user_profile: SkipUserProfile::default(),
            get_ticket: None,
        })
    }

    /// Replace the default skip-profile predicate.
    pub fn with_skip_user_profile(mut self, predicate: SkipUserProfile) -> Self {
        self.skip_user_profile = predicate;
        self
    }

    /// Install a ticket-acquisition callback, consulted when a request
    /// carries no ticket and no redirect target is configured.
    pub fn with_get_ticket<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(LoginRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StrategyResult<String>> + Send + 'static,
    {
        self.get_ticket = Some(Box::new(move |request| Box::pin(f(request))));
        self
    }

    /// Use a caller-supplied HTTP client (timeouts, proxies, and TLS policy
    /// belong to the client, not to this layer).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Run the flow and report the terminal outcome through the host sink,
    /// exactly once.
    pub async fn authenticate<S: OutcomeSink + ?Sized>(
        &self,
        request: &LoginRequest,
        sink: &mut S,
    ) {
        self.run(request).await.report(sink);
    }

    /// Run the flow to its terminal outcome.
    ///
    /// Exactly one path is taken, in fixed priority: inbound ticket, redirect
    /// to the authorization endpoint, ticket-acquisition callback, login
    /// form. A request carrying both a ticket and form credentials always
    /// takes the ticket path.
    pub async fn run(&self, request: &LoginRequest) -> Outcome {
        if let Some(ticket) = request.field(&self.options.ticket_field) {
            tracing::debug!(
                ticket = %mask_token(&ticket),
                "inbound ticket found; exchanging for access token"
            );
            return self.complete(request, ticket, Params::new()).await;
        }

        if let Some(callback_url) = self.options.callback_url.as_deref() {
            return match build_authorization_url(
                &self.options.authorization_url,
                &self.options.product_id,
                callback_url,
                self.options.scope.as_ref(),
                &self.options.scope_separator,
                self.options.state.as_deref(),
            ) {
                Ok(url) => {
                    tracing::debug!("redirecting to authorization endpoint");
                    Outcome::Redirect { url }
                }
                Err(err) => Outcome::Error(err),
            };
        }

        if let Some(get_ticket) = &self.get_ticket {
            // Callback errors surface; the flow never continues with an
            // undefined ticket.
            return match get_ticket(request.clone()).await {
                Ok(ticket) => self.complete(request, ticket, Params::new()).await,
                Err(err) => {
                    tracing::warn!("ticket-acquisition callback failed: {err}");
                    Outcome::Error(err)
                }
            };
        }

        let username = request.field(&self.options.username_field);
        let password = request.field(&self.options.password_field);
        let (Some(username), Some(password)) = (username, password) else {
            return Outcome::Fail {
                info: json!({ "message": "Missing credentials" }),
            };
        };

        let Some(ticket_url) = self.options.ticket_url.as_deref() else {
            return Outcome::Error(StrategyError::MissingOption {
                field: "ticket_url",
            });
        };

        match exchange::fetch_ticket(
            &self.client,
            ticket_url,
            &username,
            &password,
            &self.options.product_id,
        )
        .await
        {
            Ok(grant) => self.complete(request, grant.ticket, grant.params).await,
            Err(err) => {
                tracing::warn!("ticket exchange failed: {err}");
                Outcome::Error(err)
            }
        }
    }

    /// Token exchange, optional profile load, verify dispatch.
    async fn complete(&self, request: &LoginRequest, ticket: String, aux: Params) -> Outcome {
        let bundle = match exchange::exchange_token(
            &self.client,
            &self.options.token_url,
            &ticket,
            &self.options.client_secret,
            &self.options.product_id,
        )
        .await
        {
            Ok(bundle) => bundle,
            Err(err) => {
                tracing::warn!("token exchange failed: {err}");
                return Outcome::Error(err);
            }
        };
        let TokenBundle {
            access_token,
            refresh_token,
            params: token_params,
        } = bundle;
        tracing::debug!(
            access_token = %mask_token(&access_token),
            "access token issued"
        );

        // Ticket-stage auxiliary params merge beneath the token response.
        let mut params = aux;
        params.extend(token_params);

        let profile = match self.load_user_profile(&access_token).await {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!("user profile load failed: {err}");
                return Outcome::Error(err);
            }
        };

        match self
            .invoke_verify(request, access_token, refresh_token, params, profile)
            .await
        {
            Ok(Verdict::Granted { user, info }) => Outcome::Success { user, info },
            Ok(Verdict::Denied { info }) => Outcome::Fail { info },
            Err(err) => Outcome::Error(err),
        }
    }

    async fn load_user_profile(&self, access_token: &str) -> StrategyResult<Option<Profile>> {
        if self.skip_user_profile.should_skip(access_token).await? {
            return Ok(None);
        }
        let Some(url) = self.options.user_profile_url.as_deref() else {
            return Ok(None);
        };
        profile::fetch_user_profile(&self.client, url, access_token)
            .await
            .map(Some)
    }

    async fn invoke_verify(
        &self,
        request: &LoginRequest,
        access_token: String,
        refresh_token: Option<String>,
        params: Params,
        profile: Option<Profile>,
    ) -> StrategyResult<Verdict> {
        match &self.verify {
            Verify::Tokens(f) => f(access_token, refresh_token, profile).await,
            Verify::TokensWithParams(f) => f(access_token, refresh_token, params, profile).await,
            Verify::RequestTokens(f) => {
                f(request.clone(), access_token, refresh_token, profile).await
            }
            Verify::RequestTokensWithParams(f) => {
                f(request.clone(), access_token, refresh_token, params, profile).await
            }
        }
    }
}
