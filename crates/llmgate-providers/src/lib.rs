//! Provider layer for llmgate.
//!
//! Talks to each vendor over plain HTTP; no vendor SDKs.
//!
//! # Architecture
//!
//! - [`registry`] — static specs for the five supported providers
//! - [`factory`] — build a chat or embedding client from [`Config`](llmgate_core::config::Config)
//! - [`traits::ChatModel`] / [`traits::EmbeddingModel`] — what every client implements
//! - [`llm::Llm`] — instrumented invoker (start/end logs, latency, previews)
//! - [`embedder::Embedder`] — embedding encoder returning a matrix
//! - [`extract`] — JSON object extraction from model replies

pub mod anthropic;
pub mod embedder;
pub mod error;
pub mod extract;
pub mod factory;
pub mod gemini;
pub mod http_provider;
pub mod llm;
pub mod ollama;
pub mod registry;
pub mod traits;

#[cfg(test)]
mod mock;

// Re-export main types for convenience
pub use embedder::{EmbedInput, EmbedPath, Embedder, Embeddings};
pub use error::LlmError;
pub use extract::{extract_json, extract_json_from_text, parse_json, ExtractError};
pub use factory::{create_chat_model, create_embedding_model};
pub use llm::{InvocationResult, Llm};
pub use registry::{find_by_name, ProviderKind, ProviderSpec, PROVIDERS};
pub use traits::{ChatModel, ChatResponse, EmbeddingModel, UsageInfo};
