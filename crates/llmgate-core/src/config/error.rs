//! Configuration errors — raised while resolving a provider, never retried.

use thiserror::Error;

/// A provider could not be configured from the loaded settings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The provider identifier is not in the registry.
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// A key the provider cannot run without is unset or empty.
    #[error("missing configuration for provider '{provider}': {key} (set {env})")]
    MissingConfig {
        provider: String,
        key: &'static str,
        env: String,
    },

    /// A value is present but unusable (e.g. a non-numeric temperature).
    #[error("invalid configuration for provider '{provider}': {key}: {reason}")]
    Invalid {
        provider: String,
        key: &'static str,
        reason: String,
    },
}
