//! Chat and embedding factories.
//!
//! [`create_chat_model`] and [`create_embedding_model`] look up the active
//! provider in the registry, check its required keys, then call the
//! provider's builder. No network I/O happens here.

use std::sync::Arc;

use tracing::debug;

use llmgate_core::config::{Config, ConfigError, ConfigKey};

use crate::anthropic::AnthropicChat;
use crate::gemini::{GeminiChat, GeminiEmbeddings};
use crate::http_provider::{OpenAiChat, OpenAiEmbeddings};
use crate::ollama::OllamaEmbeddings;
use crate::registry::{find_by_name, ProviderKind, ProviderSpec};
use crate::traits::{ChatModel, EmbeddingModel};

/// Build the chat client for the configured provider.
///
/// Fails with [`ConfigError::UnsupportedProvider`] for an unknown
/// identifier and [`ConfigError::MissingConfig`] for the first unset
/// required key.
pub fn create_chat_model(config: &Config) -> Result<Arc<dyn ChatModel>, ConfigError> {
    let spec = find_by_name(&config.active_provider())?;
    spec.check_chat(config)?;

    debug!(provider = spec.display_name, "Creating chat model");
    (spec.chat.build)(config)
}

/// Build the embedding client for the configured provider.
///
/// `local_openai` and `anthropic` both resolve to the shared local
/// embedding backend.
pub fn create_embedding_model(config: &Config) -> Result<Arc<dyn EmbeddingModel>, ConfigError> {
    let spec = find_by_name(&config.active_provider())?;
    spec.check_embedding(config)?;

    debug!(
        provider = spec.display_name,
        local = spec.local_embeddings,
        "Creating embedding model"
    );
    (spec.embedding.build)(config)
}

/// Configured temperature, else the provider default, checked against
/// the provider's own upper bound.
fn temperature(config: &Config, spec: &ProviderSpec) -> Result<Option<f64>, ConfigError> {
    let Some(t) = config.temperature(spec.name).or(spec.chat.default_temperature) else {
        return Ok(None);
    };
    if !(0.0..=spec.max_temperature).contains(&t) {
        return Err(ConfigError::Invalid {
            provider: spec.name.to_string(),
            key: ConfigKey::Temperature.as_str(),
            reason: format!("{t} is outside 0.0–{:.1}", spec.max_temperature),
        });
    }
    Ok(Some(t))
}

/// Configured model, else the strategy default.
fn model_or_default(
    config: &Config,
    spec: &ProviderSpec,
    key: ConfigKey,
    default: Option<&'static str>,
) -> Result<String, ConfigError> {
    match (config.value(spec.name, key), default) {
        (Some(model), _) => Ok(model),
        (None, Some(default)) => Ok(default.to_string()),
        (None, None) => config.require(spec.name, key),
    }
}

// ─────────────────────────────────────────────
// Chat builders
// ─────────────────────────────────────────────

pub(crate) fn build_google_chat(config: &Config) -> Result<Arc<dyn ChatModel>, ConfigError> {
    let spec = ProviderKind::GoogleGenai.spec();
    let model = config.require(spec.name, ConfigKey::Model)?;
    let api_key = config.require(spec.name, ConfigKey::ApiKey)?;
    let base_url = config.value(spec.name, ConfigKey::BaseUrl);

    Ok(Arc::new(GeminiChat::new(
        &model,
        api_key,
        base_url.as_deref(),
        temperature(config, spec)?,
    )))
}

pub(crate) fn build_azure_chat(config: &Config) -> Result<Arc<dyn ChatModel>, ConfigError> {
    let spec = ProviderKind::AzureOpenai.spec();
    let model = config.require(spec.name, ConfigKey::Model)?;
    let deployment = config.require(spec.name, ConfigKey::Deployment)?;
    let api_version = config.require(spec.name, ConfigKey::ApiVersion)?;
    let endpoint = config.require(spec.name, ConfigKey::Endpoint)?;
    let api_key = config.require(spec.name, ConfigKey::ApiKey)?;

    Ok(Arc::new(OpenAiChat::azure(
        &endpoint,
        &deployment,
        &api_version,
        api_key,
        &model,
        temperature(config, spec)?,
    )))
}

pub(crate) fn build_openai_chat(config: &Config) -> Result<Arc<dyn ChatModel>, ConfigError> {
    let spec = ProviderKind::Openai.spec();
    let model = model_or_default(config, spec, ConfigKey::Model, spec.chat.default_model)?;
    let api_key = config.value(spec.name, ConfigKey::ApiKey);
    let base_url = config.value(spec.name, ConfigKey::BaseUrl);

    Ok(Arc::new(OpenAiChat::openai(&model, api_key, base_url.as_deref())))
}

pub(crate) fn build_local_chat(config: &Config) -> Result<Arc<dyn ChatModel>, ConfigError> {
    let spec = ProviderKind::LocalOpenai.spec();
    let model = config.require(spec.name, ConfigKey::Model)?;
    let base_url = config.require(spec.name, ConfigKey::BaseUrl)?;
    let api_key = config.require(spec.name, ConfigKey::ApiKey)?;

    Ok(Arc::new(OpenAiChat::local(&model, Some(api_key), &base_url)))
}

pub(crate) fn build_anthropic_chat(config: &Config) -> Result<Arc<dyn ChatModel>, ConfigError> {
    let spec = ProviderKind::Anthropic.spec();
    let model = config.require(spec.name, ConfigKey::Model)?;
    let api_key = config.require(spec.name, ConfigKey::ApiKey)?;
    let base_url = config.value(spec.name, ConfigKey::BaseUrl);

    Ok(Arc::new(AnthropicChat::new(
        &model,
        api_key,
        base_url.as_deref(),
        temperature(config, spec)?,
    )))
}

// ─────────────────────────────────────────────
// Embedding builders
// ─────────────────────────────────────────────

pub(crate) fn build_google_embeddings(
    config: &Config,
) -> Result<Arc<dyn EmbeddingModel>, ConfigError> {
    let spec = ProviderKind::GoogleGenai.spec();
    let model = config.require(spec.name, ConfigKey::EmbeddingModel)?;
    let api_key = config.require(spec.name, ConfigKey::ApiKey)?;
    let base_url = config.value(spec.name, ConfigKey::BaseUrl);

    Ok(Arc::new(GeminiEmbeddings::new(&model, api_key, base_url.as_deref())))
}

pub(crate) fn build_azure_embeddings(
    config: &Config,
) -> Result<Arc<dyn EmbeddingModel>, ConfigError> {
    let spec = ProviderKind::AzureOpenai.spec();
    let model = config.require(spec.name, ConfigKey::EmbeddingModel)?;
    let api_version = config.require(spec.name, ConfigKey::ApiVersion)?;
    let endpoint = config.require(spec.name, ConfigKey::Endpoint)?;
    let api_key = config.require(spec.name, ConfigKey::ApiKey)?;

    Ok(Arc::new(OpenAiEmbeddings::azure(&endpoint, &model, &api_version, api_key)))
}

pub(crate) fn build_openai_embeddings(
    config: &Config,
) -> Result<Arc<dyn EmbeddingModel>, ConfigError> {
    let spec = ProviderKind::Openai.spec();
    let model = model_or_default(
        config,
        spec,
        ConfigKey::EmbeddingModel,
        spec.embedding.default_model,
    )?;
    let api_key = config.value(spec.name, ConfigKey::ApiKey);
    let base_url = config.value(spec.name, ConfigKey::BaseUrl);

    Ok(Arc::new(OpenAiEmbeddings::openai(&model, api_key, base_url.as_deref())))
}

/// Shared by every provider whose spec sets `local_embeddings`.
pub(crate) fn build_local_embeddings(
    config: &Config,
) -> Result<Arc<dyn EmbeddingModel>, ConfigError> {
    let provider = config.active_provider();
    let model = config.require(&provider, ConfigKey::LocalEmbeddingModel)?;
    let base_url = config.require(&provider, ConfigKey::LocalEmbeddingBaseUrl)?;

    Ok(Arc::new(OllamaEmbeddings::new(&model, &base_url)))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PROVIDERS;

    /// A config with every key of every provider set.
    fn full_config(provider: &str) -> Config {
        let mut config = Config {
            model_provider: provider.to_string(),
            ..Default::default()
        };
        for name in llmgate_core::config::ProvidersConfig::NAMES {
            let s = config.providers.get_by_name_mut(name).unwrap();
            s.model = Some("some-model".into());
            s.api_key = Some("some-key".into());
            s.base_url = Some("http://localhost:9999".into());
            s.deployment = Some("deployment".into());
            s.api_version = Some("2024-10-21".into());
            s.endpoint = Some("https://res.openai.azure.com".into());
            s.embedding_model = Some("embed-model".into());
        }
        config.local_embedding.model = Some("nomic-embed-text".into());
        config.local_embedding.base_url = Some("http://localhost:11434".into());
        config
    }

    fn without(mut config: Config, key: ConfigKey) -> Config {
        let provider = config.active_provider();
        match key {
            ConfigKey::LocalEmbeddingModel => config.local_embedding.model = None,
            ConfigKey::LocalEmbeddingBaseUrl => config.local_embedding.base_url = None,
            _ => {
                let s = config.providers.get_by_name_mut(&provider).unwrap();
                match key {
                    ConfigKey::Model => s.model = None,
                    ConfigKey::ApiKey => s.api_key = None,
                    ConfigKey::BaseUrl => s.base_url = None,
                    ConfigKey::Deployment => s.deployment = None,
                    ConfigKey::ApiVersion => s.api_version = None,
                    ConfigKey::Endpoint => s.endpoint = None,
                    ConfigKey::Temperature => s.temperature = None,
                    ConfigKey::EmbeddingModel => s.embedding_model = None,
                    _ => unreachable!(),
                }
            }
        }
        config
    }

    fn missing_key(err: ConfigError) -> &'static str {
        match err {
            ConfigError::MissingConfig { key, .. } => key,
            other => panic!("expected MissingConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_every_provider_builds_chat_with_full_config() {
        for spec in PROVIDERS {
            let model = create_chat_model(&full_config(spec.name)).unwrap();
            assert_eq!(model.display_name(), spec.display_name);
        }
    }

    #[test]
    fn test_every_provider_builds_embeddings_with_full_config() {
        for spec in PROVIDERS {
            let model = create_embedding_model(&full_config(spec.name)).unwrap();
            if spec.local_embeddings {
                assert_eq!(model.display_name(), "Ollama");
                assert_eq!(model.model(), "nomic-embed-text");
            } else {
                assert_eq!(model.display_name(), spec.display_name);
            }
        }
    }

    #[test]
    fn test_removing_any_required_chat_key_fails() {
        for spec in PROVIDERS {
            for key in spec.chat.required {
                let config = without(full_config(spec.name), *key);
                let err = create_chat_model(&config).err().unwrap();
                assert_eq!(missing_key(err), key.as_str(), "{} / {}", spec.name, key);
            }
        }
    }

    #[test]
    fn test_removing_any_required_embedding_key_fails() {
        for spec in PROVIDERS {
            for key in spec.embedding.required {
                let config = without(full_config(spec.name), *key);
                let err = create_embedding_model(&config).err().unwrap();
                assert_eq!(missing_key(err), key.as_str(), "{} / {}", spec.name, key);
            }
        }
    }

    #[test]
    fn test_unsupported_provider() {
        let config = Config {
            model_provider: "mistral".into(),
            ..Default::default()
        };
        let chat_err = create_chat_model(&config).err().unwrap();
        let emb_err = create_embedding_model(&config).err().unwrap();

        assert_eq!(chat_err, ConfigError::UnsupportedProvider("mistral".into()));
        assert_eq!(emb_err, ConfigError::UnsupportedProvider("mistral".into()));
        assert!(chat_err.to_string().contains("mistral"));
    }

    #[test]
    fn test_blank_provider_is_unsupported() {
        let config = Config {
            model_provider: "  ".into(),
            ..Default::default()
        };
        assert_eq!(
            create_chat_model(&config).err().unwrap(),
            ConfigError::UnsupportedProvider(String::new())
        );
        assert_eq!(
            create_embedding_model(&config).err().unwrap(),
            ConfigError::UnsupportedProvider(String::new())
        );
    }

    #[test]
    fn test_openai_needs_nothing() {
        let config = Config {
            model_provider: "openai".into(),
            ..Default::default()
        };
        let chat = create_chat_model(&config).unwrap();
        assert_eq!(chat.model(), "gpt-4o");

        let emb = create_embedding_model(&config).unwrap();
        assert_eq!(emb.model(), "text-embedding-3-small");
    }

    #[test]
    fn test_provider_identifier_case_insensitive() {
        let chat = create_chat_model(&full_config("Anthropic")).unwrap();
        assert_eq!(chat.display_name(), "Anthropic");
    }

    #[test]
    fn test_empty_required_value_counts_as_missing() {
        let mut config = full_config("anthropic");
        config.providers.anthropic.api_key = Some(String::new());
        let err = create_chat_model(&config).err().unwrap();
        assert_eq!(missing_key(err), "api_key");
    }

    #[test]
    fn test_temperature_default_and_range() {
        let spec = ProviderKind::AzureOpenai.spec();
        let mut config = full_config("azure_openai");
        assert_eq!(temperature(&config, spec).unwrap(), Some(1.0));

        config.providers.azure_openai.temperature = Some(0.4);
        assert_eq!(temperature(&config, spec).unwrap(), Some(0.4));

        config.providers.azure_openai.temperature = Some(3.5);
        assert!(matches!(
            create_chat_model(&config).err().unwrap(),
            ConfigError::Invalid { key: "temperature", .. }
        ));
    }

    #[test]
    fn test_anthropic_temperature_capped_at_one() {
        let spec = ProviderKind::Anthropic.spec();
        let mut config = full_config("anthropic");

        config.providers.anthropic.temperature = Some(0.9);
        assert_eq!(temperature(&config, spec).unwrap(), Some(0.9));

        config.providers.anthropic.temperature = Some(1.7);
        match create_chat_model(&config).err().unwrap() {
            ConfigError::Invalid { provider, key, reason } => {
                assert_eq!(provider, "anthropic");
                assert_eq!(key, "temperature");
                assert_eq!(reason, "1.7 is outside 0.0–1.0");
            }
            other => panic!("unexpected {other:?}"),
        }

        // The same value is fine for a provider that accepts up to 2.0.
        let mut google = full_config("google_genai");
        google.providers.google_genai.temperature = Some(1.7);
        assert!(create_chat_model(&google).is_ok());
    }
}
