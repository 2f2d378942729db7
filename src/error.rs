//! Usage: Error model for the login strategy (construction, upstream calls, hooks).

use std::fmt;
use std::sync::Arc;

pub type StrategyResult<T> = Result<T, StrategyError>;

/// Which upstream call a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    Ticket,
    Token,
    Profile,
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ticket => "ticket",
            Self::Token => "token",
            Self::Profile => "profile",
        };
        f.write_str(name)
    }
}

/// Strategy failures. Sources are `Arc`-wrapped so errors stay cloneable
/// while preserving the original cause chain.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StrategyError {
    /// A required option was not supplied at construction.
    #[error("missing required option `{field}`")]
    MissingOption { field: &'static str },

    /// An option was supplied but unusable (e.g. an unparseable URL).
    #[error("invalid option `{field}`: {message}")]
    InvalidOption { field: &'static str, message: String },

    /// The HTTP client could not be constructed (e.g. the TLS backend
    /// failed to initialize).
    #[error("http client construction failed: {source}")]
    HttpClient {
        #[source]
        source: Arc<reqwest::Error>,
    },

    /// A ticket/token/profile call failed at the transport level, returned a
    /// non-success status, or sent back an unusable body.
    #[error("{stage} call failed: {message}")]
    Upstream {
        stage: UpstreamStage,
        message: String,
        #[source]
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    /// The profile endpoint responded, but the body is not valid JSON.
    #[error("user profile response is not valid json: {source}")]
    ProfileParse {
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// Failure reported by an application hook (verify callback, skip-profile
    /// predicate, or ticket-acquisition callback).
    #[error("{message}")]
    Application {
        message: String,
        #[source]
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },
}

impl StrategyError {
    pub(crate) fn upstream(stage: UpstreamStage, message: impl Into<String>) -> Self {
        Self::Upstream {
            stage,
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn upstream_caused(
        stage: UpstreamStage,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Upstream {
            stage,
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    /// Constructor for application hooks that need to fail the flow with a
    /// message of their own.
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
            source: None,
        }
    }

    /// Like [`StrategyError::application`], keeping the underlying cause.
    pub fn application_caused(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Application {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    /// The stage tag when this is an upstream failure.
    pub fn upstream_stage(&self) -> Option<UpstreamStage> {
        match self {
            Self::Upstream { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn upstream_error_preserves_original_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StrategyError::upstream_caused(
            UpstreamStage::Token,
            "token response json invalid",
            cause,
        );
        assert_eq!(err.upstream_stage(), Some(UpstreamStage::Token));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("token call failed:"));
    }

    #[test]
    fn missing_option_names_the_field() {
        let err = StrategyError::MissingOption {
            field: "authorization_url",
        };
        assert_eq!(err.to_string(), "missing required option `authorization_url`");
    }

    #[test]
    fn profile_parse_is_not_an_upstream_kind() {
        let cause = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = StrategyError::ProfileParse {
            source: Arc::new(cause),
        };
        assert_eq!(err.upstream_stage(), None);
    }
}
