//! Usage: Application hook contracts: verify-callback variants, the
//! skip-profile predicate, and the ticket-acquisition callback.
//!
//! Every hook is asynchronous with a boxed future so the library stays
//! runtime-agnostic; fixed and synchronous answers are just variants that
//! resolve immediately.

use crate::error::StrategyResult;
use crate::outcome::Verdict;
use crate::profile::Profile;
use crate::request::LoginRequest;
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;

/// Additional token-response parameters forwarded to the verify callback.
pub type Params = Map<String, Value>;

pub type VerifyFuture = Pin<Box<dyn Future<Output = StrategyResult<Verdict>> + Send>>;
pub type SkipFuture = Pin<Box<dyn Future<Output = StrategyResult<bool>> + Send>>;
pub type TicketFuture = Pin<Box<dyn Future<Output = StrategyResult<String>> + Send>>;

type TokensFn = dyn Fn(String, Option<String>, Option<Profile>) -> VerifyFuture + Send + Sync;
type TokensWithParamsFn =
    dyn Fn(String, Option<String>, Params, Option<Profile>) -> VerifyFuture + Send + Sync;
type RequestTokensFn =
    dyn Fn(LoginRequest, String, Option<String>, Option<Profile>) -> VerifyFuture + Send + Sync;
type RequestTokensWithParamsFn = dyn Fn(LoginRequest, String, Option<String>, Params, Option<Profile>) -> VerifyFuture
    + Send
    + Sync;

/// The application's verify callback.
///
/// The variant picked at construction time fixes the calling convention:
/// whether the request snapshot is forwarded and whether the auxiliary
/// params mapping is passed. There is no runtime signature inspection; a
/// shape outside these four cannot be configured.
pub enum Verify {
    /// `(access_token, refresh_token, profile)`
    Tokens(Box<TokensFn>),
    /// `(access_token, refresh_token, params, profile)`
    TokensWithParams(Box<TokensWithParamsFn>),
    /// `(request, access_token, refresh_token, profile)`
    RequestTokens(Box<RequestTokensFn>),
    /// `(request, access_token, refresh_token, params, profile)`
    RequestTokensWithParams(Box<RequestTokensWithParamsFn>),
}

impl Verify {
    pub fn tokens<F, Fut>(f: F) -> Self
    where
        F: Fn(String, Option<String>, Option<Profile>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StrategyResult<Verdict>> + Send + 'static,
    {
        Self::Tokens(Box::new(move |access, refresh, profile| {
            Box::pin(f(access, refresh, profile))
        }))
    }

    pub fn tokens_with_params<F, Fut>(f: F) -> Self
    where
        F: Fn(String, Option<String>, Params, Option<Profile>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StrategyResult<Verdict>> + Send + 'static,
    {
        Self::TokensWithParams(Box::new(move |access, refresh, params, profile| {
            Box::pin(f(access, refresh, params, profile))
        }))
    }

    pub fn request_tokens<F, Fut>(f: F) -> Self
    where
        F: Fn(LoginRequest, String, Option<String>, Option<Profile>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StrategyResult<Verdict>> + Send + 'static,
    {
        Self::RequestTokens(Box::new(move |request, access, refresh, profile| {
            Box::pin(f(request, access, refresh, profile))
        }))
    }

    pub fn request_tokens_with_params<F, Fut>(f: F) -> Self
    where
        F: Fn(LoginRequest, String, Option<String>, Params, Option<Profile>) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = StrategyResult<Verdict>> + Send + 'static,
    {
        Self::RequestTokensWithParams(Box::new(
            move |request, access, refresh, params, profile| {
                Box::pin(f(request, access, refresh, params, profile))
            },
        ))
    }
}

type SkipDecideFn = dyn Fn(String) -> SkipFuture + Send + Sync;

/// Whether to skip the profile-fetch step.
///
/// `Never` and `Always` cover the fixed-boolean case; `Decide` receives the
/// access token and may consult the provider.
pub enum SkipUserProfile {
    Never,
    Always,
    Decide(Box<SkipDecideFn>),
}

impl Default for SkipUserProfile {
    fn default() -> Self {
        Self::Never
    }
}

impl SkipUserProfile {
    pub fn fixed(skip: bool) -> Self {
        if skip {
            Self::Always
        } else {
            Self::Never
        }
    }

    pub fn decide<F, Fut>(f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StrategyResult<bool>> + Send + 'static,
    {
        Self::Decide(Box::new(move |access_token| Box::pin(f(access_token))))
    }

    pub(crate) async fn should_skip(&self, access_token: &str) -> StrategyResult<bool> {
        match self {
            Self::Never => Ok(false),
            Self::Always => Ok(true),
            Self::Decide(f) => f(access_token.to_string()).await,
        }
    }
}

/// Ticket-acquisition callback: asked for a ticket when the request carries
/// none and no redirect target is configured. Errors surface as an error
/// outcome; they are never swallowed.
pub type GetTicket = Box<dyn Fn(LoginRequest) -> TicketFuture + Send + Sync>;
