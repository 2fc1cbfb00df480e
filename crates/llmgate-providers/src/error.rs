//! Errors raised while talking to a model backend.

use llmgate_core::config::ConfigError;
use thiserror::Error;

/// Failure of a chat or embedding call.
///
/// The invoker and encoder hand these back unchanged; only structured
/// extraction turns them into an absent result.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error("request to {provider} failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("{provider} API error: {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The backend answered 2xx but the body is not what we expect.
    #[error("invalid response from {provider}: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },
}

impl LlmError {
    pub(crate) fn invalid(provider: &'static str, reason: impl Into<String>) -> Self {
        LlmError::InvalidResponse {
            provider,
            reason: reason.into(),
        }
    }
}
