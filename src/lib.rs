//! Ticket-exchange OAuth login strategy for request-authentication
//! middleware.
//!
//! The strategy accepts an inbound request snapshot (form body and query
//! parameters, or an already-issued ticket), exchanges credentials for a
//! provider ticket, the ticket for an access token, optionally loads the
//! user profile, and hands everything to the application's verify callback.
//! The host middleware receives exactly one terminal outcome per request
//! through the [`OutcomeSink`] trait: redirect, success, fail, or error.

mod authorize;
mod callbacks;
mod config;
mod error;
mod exchange;
mod outcome;
mod profile;
mod request;
mod security;
mod strategy;

pub use callbacks::{
    GetTicket, Params, SkipFuture, SkipUserProfile, TicketFuture, Verify, VerifyFuture,
};
pub use config::{Scope, StrategyConfig};
pub use error::{StrategyError, StrategyResult, UpstreamStage};
pub use outcome::{Outcome, OutcomeSink, Verdict};
pub use profile::{Profile, PROVIDER_NAME};
pub use request::LoginRequest;
pub use strategy::Strategy;
