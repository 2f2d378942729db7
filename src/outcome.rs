//! Usage: Terminal authentication outcomes and the host-reporting seam.

use crate::error::StrategyError;
use serde_json::Value;

/// Decision returned by the application's verify callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Authentication accepted; `user` is handed to the host as-is.
    Granted { user: Value, info: Value },
    /// Authentication declined without being an error (bad credentials,
    /// deactivated account, ...).
    Denied { info: Value },
}

impl Verdict {
    pub fn granted(user: Value) -> Self {
        Self::Granted {
            user,
            info: Value::Null,
        }
    }

    pub fn denied(info: Value) -> Self {
        Self::Denied { info }
    }
}

/// Terminal result of one authentication attempt. Exactly one is produced
/// per request.
#[derive(Debug)]
pub enum Outcome {
    /// Send the user agent to the provider's authorization endpoint; the
    /// provider re-enters the flow later with a ticket.
    Redirect { url: String },
    Success { user: Value, info: Value },
    Fail { info: Value },
    Error(StrategyError),
}

impl Outcome {
    /// Report this outcome through the host sink. Consumes the outcome, so a
    /// flow cannot report twice.
    pub fn report<S: OutcomeSink + ?Sized>(self, sink: &mut S) {
        match self {
            Self::Redirect { url } => sink.redirect(url),
            Self::Success { user, info } => sink.success(user, info),
            Self::Fail { info } => sink.fail(info),
            Self::Error(err) => sink.error(err),
        }
    }
}

/// Implemented by the host middleware to receive the terminal outcome.
pub trait OutcomeSink {
    fn redirect(&mut self, url: String);
    fn success(&mut self, user: Value, info: Value);
    fn fail(&mut self, info: Value);
    fn error(&mut self, err: StrategyError);
}
