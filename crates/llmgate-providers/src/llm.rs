//! Instrumented invoker.
//!
//! [`Llm`] wraps any chat client, logs a start marker with an input
//! preview, times the call and logs the latency with an output preview.
//! Only the reply text is handed back.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use llmgate_core::config::{Config, ConfigError};
use llmgate_core::types::ChatInput;
use llmgate_core::utils::{preview_input, truncate_preview, PREVIEW_LEN};

use crate::error::LlmError;
use crate::factory::create_chat_model;
use crate::traits::ChatModel;

/// Reply text of one invocation plus how long it took.
#[derive(Clone, Debug, PartialEq)]
pub struct InvocationResult {
    pub content: String,
    pub latency: Duration,
}

/// A chat client with uniform invocation logging.
#[derive(Clone)]
pub struct Llm {
    model: Arc<dyn ChatModel>,
    provider: String,
}

impl std::fmt::Debug for Llm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Llm")
            .field("provider", &self.provider)
            .field("model", &self.model.model())
            .finish()
    }
}

impl Llm {
    /// Build the chat client for the configured provider.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(create_chat_model(config)?, config.active_provider()))
    }

    pub fn new(model: Arc<dyn ChatModel>, provider: impl Into<String>) -> Self {
        Self {
            model,
            provider: provider.into(),
        }
    }

    /// Provider identifier used in log lines.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model_name(&self) -> &str {
        self.model.model()
    }

    /// The underlying client, for callers that need more than the text.
    pub fn chat_model(&self) -> Arc<dyn ChatModel> {
        Arc::clone(&self.model)
    }

    /// Send `input` and return the reply text.
    ///
    /// Backend errors are logged and returned unchanged.
    pub async fn invoke(&self, input: impl Into<ChatInput>) -> Result<String, LlmError> {
        self.invoke_timed(input).await.map(|r| r.content)
    }

    /// Like [`invoke`](Self::invoke), also returning the measured latency.
    pub async fn invoke_timed(
        &self,
        input: impl Into<ChatInput>,
    ) -> Result<InvocationResult, LlmError> {
        let input = input.into();

        info!(
            "LLM invoke START | Provider: {} | Model: {}",
            self.provider,
            self.model.model()
        );
        info!("Input: {}", preview_input(&input));

        let start = Instant::now();
        let result = self.model.chat(&input.into_messages()).await;
        let latency = start.elapsed();

        match result {
            Ok(response) => {
                info!("LLM invoke END | Latency: {:.2}s", latency.as_secs_f64());
                info!("Output: {}", truncate_preview(&response.content, PREVIEW_LEN));
                Ok(InvocationResult {
                    content: response.content,
                    latency,
                })
            }
            Err(e) => {
                error!(
                    "LLM invoke FAILED | Latency: {:.2}s | Error: {}",
                    latency.as_secs_f64(),
                    e
                );
                Err(e)
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
