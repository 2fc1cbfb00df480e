//! Config loader — reads `~/.llmgate/config.json` and merges env vars.
//!
//! Loading is an explicit step: the host calls [`load_config`] once before
//! building any client. Nothing is read at import time.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.llmgate/config.json`
//! 3. Environment variables (override JSON), e.g. `MODEL_PROVIDER`,
//!    `GOOGLE_API_KEY`, `AZURE_OPENAI_DEPLOYMENT_NAME`, `LOCAL_EMBEDDING_MODEL`

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{env_var, ConfigKey, Config, ProvidersConfig};

/// Env var selecting the active provider.
pub const PROVIDER_ENV: &str = "MODEL_PROVIDER";

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path (or `path`) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_file(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_file(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply process environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |name| std::env::var(name).ok())
}

/// Apply overrides from an arbitrary variable source.
///
/// Every provider section is filled from its own variables (see
/// [`env_var`]); the local embedding pair is read once.
pub fn apply_overrides_from<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    // Set-but-empty replaces the selector; only an unset variable keeps it.
    if let Some(val) = lookup(PROVIDER_ENV) {
        config.model_provider = val;
    }

    for name in ProvidersConfig::NAMES {
        apply_provider_env(&mut config, name, &lookup);
    }

    if let Some(val) = lookup(&env_var("", ConfigKey::LocalEmbeddingModel)) {
        config.local_embedding.model = Some(val);
    }
    if let Some(val) = lookup(&env_var("", ConfigKey::LocalEmbeddingBaseUrl)) {
        config.local_embedding.base_url = Some(val);
    }

    config
}

/// Apply env var overrides for a single provider section.
fn apply_provider_env<F>(config: &mut Config, name: &str, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(settings) = config.providers.get_by_name_mut(name) else {
        return;
    };

    for key in ConfigKey::ALL {
        let var = env_var(name, key);
        let Some(val) = lookup(&var) else {
            continue;
        };
        match key {
            ConfigKey::Model => settings.model = Some(val),
            ConfigKey::ApiKey => settings.api_key = Some(val),
            ConfigKey::BaseUrl => settings.base_url = Some(val),
            ConfigKey::Deployment => settings.deployment = Some(val),
            ConfigKey::ApiVersion => settings.api_version = Some(val),
            ConfigKey::Endpoint => settings.endpoint = Some(val),
            ConfigKey::EmbeddingModel => settings.embedding_model = Some(val),
            ConfigKey::Temperature => match val.trim().parse::<f64>() {
                Ok(t) => settings.temperature = Some(t),
                Err(_) => warn!("Ignoring non-numeric {}={}", var, val),
            },
            ConfigKey::LocalEmbeddingModel | ConfigKey::LocalEmbeddingBaseUrl => {}
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_file(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(r#"{
            "modelProvider": "openai",
            "providers": { "openai": { "model": "gpt-4o-mini" } }
        }"#);

        let config = load_config_file(file.path());
        assert_eq!(config.model_provider, "openai");
        assert_eq!(config.providers.openai.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_file(file.path());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.model_provider = "anthropic".to_string();
        config.providers.anthropic.api_key = Some("sk-ant-test".to_string());

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_file(&path);
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_env_selects_provider() {
        let config = apply_overrides_from(Config::default(), env(&[("MODEL_PROVIDER", "anthropic")]));
        assert_eq!(config.model_provider, "anthropic");
    }

    #[test]
    fn test_empty_env_provider_replaces_selector() {
        let config = apply_overrides_from(Config::default(), env(&[("MODEL_PROVIDER", "")]));
        assert_eq!(config.model_provider, "");
        assert_eq!(config.active_provider(), "");
    }

    #[test]
    fn test_unset_env_provider_keeps_default() {
        let config = apply_overrides_from(Config::default(), env(&[]));
        assert_eq!(config.model_provider, "azure_openai");
    }

    #[test]
    fn test_env_fills_provider_sections() {
        let config = apply_overrides_from(
            Config::default(),
            env(&[
                ("GOOGLE_MODEL", "gemini-2.5-flash"),
                ("GOOGLE_API_KEY", "g-key"),
                ("GOOGLE_EMBEDDING_MODEL", "gemini-embedding-001"),
                ("AZURE_OPENAI_DEPLOYMENT_NAME", "prod-gpt"),
                ("AZURE_OPENAI_API_VERSION", "2024-10-21"),
                ("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com"),
                ("LOCAL_OPENAI_BASE_URL", "http://localhost:8080/v1"),
                ("ANTHROPIC_TEMPERATURE", "0.3"),
            ]),
        );

        let p = &config.providers;
        assert_eq!(p.google_genai.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(p.google_genai.api_key.as_deref(), Some("g-key"));
        assert_eq!(p.google_genai.embedding_model.as_deref(), Some("gemini-embedding-001"));
        assert_eq!(p.azure_openai.deployment.as_deref(), Some("prod-gpt"));
        assert_eq!(p.azure_openai.api_version.as_deref(), Some("2024-10-21"));
        assert_eq!(p.azure_openai.endpoint.as_deref(), Some("https://res.openai.azure.com"));
        assert_eq!(p.local_openai.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(p.anthropic.temperature, Some(0.3));
        // Untouched sections stay empty
        assert_eq!(p.openai, Default::default());
    }

    #[test]
    fn test_env_local_embedding() {
        let config = apply_overrides_from(
            Config::default(),
            env(&[
                ("LOCAL_EMBEDDING_MODEL", "nomic-embed-text"),
                ("LOCAL_EMBEDDING_BASE_URL", "http://localhost:11434"),
            ]),
        );
        assert_eq!(config.local_embedding.model.as_deref(), Some("nomic-embed-text"));
        assert_eq!(config.local_embedding.base_url.as_deref(), Some("http://localhost:11434"));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_temp_json(r#"{
            "providers": { "anthropic": { "model": "from-file", "apiKey": "file-key" } }
        }"#);
        let config = apply_overrides_from(
            load_config_file(file.path()),
            env(&[("ANTHROPIC_MODEL", "from-env")]),
        );
        assert_eq!(config.providers.anthropic.model.as_deref(), Some("from-env"));
        assert_eq!(config.providers.anthropic.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_env_bad_temperature_is_ignored() {
        let mut base = Config::default();
        base.providers.azure_openai.temperature = Some(1.0);
        let config = apply_overrides_from(base, env(&[("AZURE_OPENAI_TEMPERATURE", "warm")]));
        assert_eq!(config.providers.azure_openai.temperature, Some(1.0));
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw.get("modelProvider").is_some());
        assert!(raw.get("model_provider").is_none());
    }
}
