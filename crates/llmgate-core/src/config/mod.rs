//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use llmgate_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Provider: {}", cfg.active_provider());
//! ```

pub mod error;
pub mod loader;
pub mod schema;

// Re-export key types
pub use error::ConfigError;
pub use loader::{apply_env_overrides, get_config_path, load_config, save_config};
pub use schema::{env_var, Config, ConfigKey, LocalEmbeddingSettings, ProviderSettings, ProvidersConfig};
