//! Configuration schema — which provider is active and the settings of
//! every provider.
//!
//! JSON on disk uses **camelCase** field names; provider sections keep their
//! identifier (`google_genai`, `azure_openai`, ...) as the key.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ConfigError;

/// Provider selected when nothing is configured.
pub const DEFAULT_PROVIDER: &str = "azure_openai";

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded once from `~/.llmgate/config.json` + env vars.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Identifier of the active provider.
    pub model_provider: String,
    pub providers: ProvidersConfig,
    /// Shared local embedding backend for providers without an embedding API.
    pub local_embedding: LocalEmbeddingSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_provider: DEFAULT_PROVIDER.to_string(),
            providers: ProvidersConfig::default(),
            local_embedding: LocalEmbeddingSettings::default(),
        }
    }
}

impl Config {
    /// The active provider identifier, normalized to lowercase.
    ///
    /// [`DEFAULT_PROVIDER`] applies only when no selector was given at all;
    /// a blank selector stays blank and is rejected as unsupported.
    pub fn active_provider(&self) -> String {
        self.model_provider.trim().to_lowercase()
    }

    /// Read a key for a provider as a string.
    ///
    /// Empty strings count as unset. Local embedding keys are shared by all
    /// providers.
    pub fn value(&self, provider: &str, key: ConfigKey) -> Option<String> {
        let raw = match key {
            ConfigKey::LocalEmbeddingModel => self.local_embedding.model.clone(),
            ConfigKey::LocalEmbeddingBaseUrl => self.local_embedding.base_url.clone(),
            _ => {
                let settings = self.providers.get_by_name(provider)?;
                match key {
                    ConfigKey::Model => settings.model.clone(),
                    ConfigKey::ApiKey => settings.api_key.clone(),
                    ConfigKey::BaseUrl => settings.base_url.clone(),
                    ConfigKey::Deployment => settings.deployment.clone(),
                    ConfigKey::ApiVersion => settings.api_version.clone(),
                    ConfigKey::Endpoint => settings.endpoint.clone(),
                    ConfigKey::EmbeddingModel => settings.embedding_model.clone(),
                    ConfigKey::Temperature => settings.temperature.map(|t| t.to_string()),
                    ConfigKey::LocalEmbeddingModel | ConfigKey::LocalEmbeddingBaseUrl => None,
                }
            }
        };
        raw.filter(|v| !v.trim().is_empty())
    }

    /// Read a key the provider cannot run without.
    pub fn require(&self, provider: &str, key: ConfigKey) -> Result<String, ConfigError> {
        self.value(provider, key)
            .ok_or_else(|| ConfigError::MissingConfig {
                provider: provider.to_string(),
                key: key.as_str(),
                env: env_var(provider, key),
            })
    }

    /// Configured temperature for a provider, if any.
    pub fn temperature(&self, provider: &str) -> Option<f64> {
        self.providers.get_by_name(provider)?.temperature
    }
}

// ─────────────────────────────────────────────
// Keys
// ─────────────────────────────────────────────

/// A named configuration value a provider may require.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Model,
    ApiKey,
    BaseUrl,
    Deployment,
    ApiVersion,
    Endpoint,
    Temperature,
    EmbeddingModel,
    LocalEmbeddingModel,
    LocalEmbeddingBaseUrl,
}

impl ConfigKey {
    /// Every key, in display order.
    pub const ALL: [ConfigKey; 10] = [
        ConfigKey::Model,
        ConfigKey::ApiKey,
        ConfigKey::BaseUrl,
        ConfigKey::Deployment,
        ConfigKey::ApiVersion,
        ConfigKey::Endpoint,
        ConfigKey::Temperature,
        ConfigKey::EmbeddingModel,
        ConfigKey::LocalEmbeddingModel,
        ConfigKey::LocalEmbeddingBaseUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Model => "model",
            ConfigKey::ApiKey => "api_key",
            ConfigKey::BaseUrl => "base_url",
            ConfigKey::Deployment => "deployment",
            ConfigKey::ApiVersion => "api_version",
            ConfigKey::Endpoint => "endpoint",
            ConfigKey::Temperature => "temperature",
            ConfigKey::EmbeddingModel => "embedding_model",
            ConfigKey::LocalEmbeddingModel => "local_embedding.model",
            ConfigKey::LocalEmbeddingBaseUrl => "local_embedding.base_url",
        }
    }

    fn env_suffix(&self) -> &'static str {
        match self {
            ConfigKey::Model => "MODEL",
            ConfigKey::ApiKey => "API_KEY",
            ConfigKey::BaseUrl => "BASE_URL",
            ConfigKey::Deployment => "DEPLOYMENT_NAME",
            ConfigKey::ApiVersion => "API_VERSION",
            ConfigKey::Endpoint => "ENDPOINT",
            ConfigKey::Temperature => "TEMPERATURE",
            ConfigKey::EmbeddingModel => "EMBEDDING_MODEL",
            ConfigKey::LocalEmbeddingModel => "MODEL",
            ConfigKey::LocalEmbeddingBaseUrl => "BASE_URL",
        }
    }

    fn is_local_embedding(&self) -> bool {
        matches!(
            self,
            ConfigKey::LocalEmbeddingModel | ConfigKey::LocalEmbeddingBaseUrl
        )
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment variable prefix for a provider (e.g. `azure_openai` → `AZURE_OPENAI`).
pub fn env_prefix(provider: &str) -> String {
    match provider {
        "google_genai" => "GOOGLE".to_string(),
        other => other.to_uppercase(),
    }
}

/// Environment variable that supplies `key` for `provider`.
///
/// E.g. `("azure_openai", Deployment)` → `AZURE_OPENAI_DEPLOYMENT_NAME`,
/// `(_, LocalEmbeddingModel)` → `LOCAL_EMBEDDING_MODEL`.
pub fn env_var(provider: &str, key: ConfigKey) -> String {
    if key.is_local_embedding() {
        format!("LOCAL_EMBEDDING_{}", key.env_suffix())
    } else {
        format!("{}_{}", env_prefix(provider), key.env_suffix())
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Settings for one provider. Which fields matter depends on the provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API base URL (overrides the provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Azure deployment name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
    /// Azure API version (e.g. `2024-10-21`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// Azure resource endpoint (e.g. `https://my-resource.openai.azure.com`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Sampling temperature (0.0 – 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
}

/// All provider settings, one section per supported provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProvidersConfig {
    pub google_genai: ProviderSettings,
    pub azure_openai: ProviderSettings,
    pub openai: ProviderSettings,
    pub local_openai: ProviderSettings,
    pub anthropic: ProviderSettings,
}

impl ProvidersConfig {
    /// Section names, in display order.
    pub const NAMES: [&'static str; 5] = [
        "google_genai",
        "azure_openai",
        "openai",
        "local_openai",
        "anthropic",
    ];

    /// Get a provider's settings by identifier (e.g. `"anthropic"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderSettings> {
        match name {
            "google_genai" => Some(&self.google_genai),
            "azure_openai" => Some(&self.azure_openai),
            "openai" => Some(&self.openai),
            "local_openai" => Some(&self.local_openai),
            "anthropic" => Some(&self.anthropic),
            _ => None,
        }
    }

    /// Mutable variant of [`get_by_name`](Self::get_by_name).
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut ProviderSettings> {
        match name {
            "google_genai" => Some(&mut self.google_genai),
            "azure_openai" => Some(&mut self.azure_openai),
            "openai" => Some(&mut self.openai),
            "local_openai" => Some(&mut self.local_openai),
            "anthropic" => Some(&mut self.anthropic),
            _ => None,
        }
    }
}

/// Local embedding server (Ollama) shared by `local_openai` and `anthropic`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalEmbeddingSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
