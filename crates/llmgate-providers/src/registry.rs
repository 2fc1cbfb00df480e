//! Provider registry — static specs for the five supported providers.
//!
//! Each `ProviderSpec` names the configuration keys a provider needs for
//! chat and for embeddings, plus the function that builds each client.
//! Dispatch is a table lookup by identifier; anything not in the table is
//! rejected as unsupported.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use llmgate_core::config::{Config, ConfigError, ConfigKey};

use crate::factory;
use crate::traits::{ChatModel, EmbeddingModel};

// ─────────────────────────────────────────────
// ProviderKind
// ─────────────────────────────────────────────

/// One supported provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    GoogleGenai,
    AzureOpenai,
    Openai,
    LocalOpenai,
    Anthropic,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::GoogleGenai,
        ProviderKind::AzureOpenai,
        ProviderKind::Openai,
        ProviderKind::LocalOpenai,
        ProviderKind::Anthropic,
    ];

    /// Identifier used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GoogleGenai => "google_genai",
            ProviderKind::AzureOpenai => "azure_openai",
            ProviderKind::Openai => "openai",
            ProviderKind::LocalOpenai => "local_openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    /// Registry entry for this provider.
    pub fn spec(&self) -> &'static ProviderSpec {
        // Indexes follow table order (checked in tests).
        match self {
            ProviderKind::GoogleGenai => &PROVIDERS[0],
            ProviderKind::AzureOpenai => &PROVIDERS[1],
            ProviderKind::Openai => &PROVIDERS[2],
            ProviderKind::LocalOpenai => &PROVIDERS[3],
            ProviderKind::Anthropic => &PROVIDERS[4],
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    /// Case-insensitive; unknown identifiers are an error, never a default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|k| k.as_str() == name)
            .ok_or_else(|| ConfigError::UnsupportedProvider(s.to_string()))
    }
}

// ─────────────────────────────────────────────
// ProviderSpec
// ─────────────────────────────────────────────

/// Builds a chat client from a config already checked against `required`.
pub type ChatBuilder = fn(&Config) -> Result<Arc<dyn ChatModel>, ConfigError>;

/// Builds an embedding client from a config already checked against `required`.
pub type EmbeddingBuilder = fn(&Config) -> Result<Arc<dyn EmbeddingModel>, ConfigError>;

/// How to construct one kind of client for a provider.
#[derive(Clone, Debug)]
pub struct Strategy<B> {
    /// Keys that must be set; construction fails without them.
    pub required: &'static [ConfigKey],
    /// Keys that are read when present.
    pub optional: &'static [ConfigKey],
    /// Model used when `model`/`embedding_model` is optional and unset.
    pub default_model: Option<&'static str>,
    /// Temperature used when the provider takes one and none is configured.
    pub default_temperature: Option<f64>,
    pub build: B,
}

/// Static specification describing one provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    pub kind: ProviderKind,
    /// Identifier (e.g. `"azure_openai"`).
    pub name: &'static str,
    /// Human-readable name for logs.
    pub display_name: &'static str,
    pub chat: Strategy<ChatBuilder>,
    pub embedding: Strategy<EmbeddingBuilder>,
    /// Embeddings go to the shared local backend instead of this vendor.
    pub local_embeddings: bool,
    /// Highest temperature the vendor accepts; the lower bound is 0.
    pub max_temperature: f64,
}

impl ProviderSpec {
    /// Required chat keys that are unset in `config`.
    pub fn missing_chat_keys(&self, config: &Config) -> Vec<ConfigKey> {
        missing(self.name, self.chat.required, config)
    }

    /// Required embedding keys that are unset in `config`.
    pub fn missing_embedding_keys(&self, config: &Config) -> Vec<ConfigKey> {
        missing(self.name, self.embedding.required, config)
    }

    /// Fail with the first missing chat key, in table order.
    pub fn check_chat(&self, config: &Config) -> Result<(), ConfigError> {
        check(self.name, self.chat.required, config)
    }

    /// Fail with the first missing embedding key, in table order.
    pub fn check_embedding(&self, config: &Config) -> Result<(), ConfigError> {
        check(self.name, self.embedding.required, config)
    }
}

fn missing(provider: &str, keys: &[ConfigKey], config: &Config) -> Vec<ConfigKey> {
    keys.iter()
        .copied()
        .filter(|k| config.value(provider, *k).is_none())
        .collect()
}

fn check(provider: &str, keys: &[ConfigKey], config: &Config) -> Result<(), ConfigError> {
    for key in keys {
        config.require(provider, *key)?;
    }
    Ok(())
}

// ─────────────────────────────────────────────
// All providers
// ─────────────────────────────────────────────

const LOCAL_EMBEDDING_KEYS: &[ConfigKey] =
    &[ConfigKey::LocalEmbeddingModel, ConfigKey::LocalEmbeddingBaseUrl];

/// Complete list of supported providers.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        kind: ProviderKind::GoogleGenai,
        name: "google_genai",
        display_name: "Google GenAI",
        chat: Strategy {
            required: &[ConfigKey::Model, ConfigKey::ApiKey],
            optional: &[ConfigKey::Temperature, ConfigKey::BaseUrl],
            default_model: None,
            default_temperature: Some(0.0),
            build: factory::build_google_chat,
        },
        embedding: Strategy {
            required: &[ConfigKey::EmbeddingModel, ConfigKey::ApiKey],
            optional: &[ConfigKey::BaseUrl],
            default_model: None,
            default_temperature: None,
            build: factory::build_google_embeddings,
        },
        local_embeddings: false,
        max_temperature: 2.0,
    },
    ProviderSpec {
        kind: ProviderKind::AzureOpenai,
        name: "azure_openai",
        display_name: "Azure OpenAI",
        chat: Strategy {
            required: &[
                ConfigKey::Model,
                ConfigKey::Deployment,
                ConfigKey::ApiVersion,
                ConfigKey::Endpoint,
                ConfigKey::ApiKey,
            ],
            optional: &[ConfigKey::Temperature],
            default_model: None,
            default_temperature: Some(1.0),
            build: factory::build_azure_chat,
        },
        embedding: Strategy {
            required: &[
                ConfigKey::EmbeddingModel,
                ConfigKey::ApiVersion,
                ConfigKey::Endpoint,
                ConfigKey::ApiKey,
            ],
            optional: &[],
            default_model: None,
            default_temperature: None,
            build: factory::build_azure_embeddings,
        },
        local_embeddings: false,
        max_temperature: 2.0,
    },
    ProviderSpec {
        kind: ProviderKind::Openai,
        name: "openai",
        display_name: "OpenAI",
        chat: Strategy {
            required: &[],
            optional: &[ConfigKey::Model, ConfigKey::ApiKey, ConfigKey::BaseUrl],
            default_model: Some("gpt-4o"),
            default_temperature: None,
            build: factory::build_openai_chat,
        },
        embedding: Strategy {
            required: &[],
            optional: &[ConfigKey::EmbeddingModel, ConfigKey::ApiKey, ConfigKey::BaseUrl],
            default_model: Some("text-embedding-3-small"),
            default_temperature: None,
            build: factory::build_openai_embeddings,
        },
        local_embeddings: false,
        max_temperature: 2.0,
    },
    ProviderSpec {
        kind: ProviderKind::LocalOpenai,
        name: "local_openai",
        display_name: "Local OpenAI",
        chat: Strategy {
            required: &[ConfigKey::Model, ConfigKey::BaseUrl, ConfigKey::ApiKey],
            optional: &[],
            default_model: None,
            default_temperature: None,
            build: factory::build_local_chat,
        },
        embedding: Strategy {
            required: LOCAL_EMBEDDING_KEYS,
            optional: &[],
            default_model: None,
            default_temperature: None,
            build: factory::build_local_embeddings,
        },
        local_embeddings: true,
        max_temperature: 2.0,
    },
    ProviderSpec {
        kind: ProviderKind::Anthropic,
        name: "anthropic",
        display_name: "Anthropic",
        chat: Strategy {
            required: &[ConfigKey::Model, ConfigKey::ApiKey],
            optional: &[ConfigKey::Temperature, ConfigKey::BaseUrl],
            default_model: None,
            default_temperature: Some(0.0),
            build: factory::build_anthropic_chat,
        },
        embedding: Strategy {
            required: LOCAL_EMBEDDING_KEYS,
            optional: &[],
            default_model: None,
            default_temperature: None,
            build: factory::build_local_embeddings,
        },
        local_embeddings: true,
        max_temperature: 1.0,
    },
];

// ─────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────

/// Find a provider spec by identifier (case-insensitive).
pub fn find_by_name(name: &str) -> Result<&'static ProviderSpec, ConfigError> {
    name.parse::<ProviderKind>().map(|kind| kind.spec())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
