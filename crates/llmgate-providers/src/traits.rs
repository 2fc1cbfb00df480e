//! Model traits — the seams every backend plugs into.
//!
//! A chat backend implements [`ChatModel`]; an embedding backend implements
//! [`EmbeddingModel`]. Factories hand them out as `Arc<dyn ...>` so one
//! handle can be shared across tasks for the lifetime of the process.

use async_trait::async_trait;
use llmgate_core::types::Message;

use crate::error::LlmError;

/// Token usage reported by the backend, when it reports any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsageInfo {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Response of a single chat completion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatResponse {
    /// Text content of the reply (empty if the backend returned none).
    pub content: String,
    /// Why the model stopped generating.
    pub finish_reason: Option<String>,
    pub usage: Option<UsageInfo>,
}

impl ChatResponse {
    pub fn text(content: impl Into<String>) -> Self {
        ChatResponse {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// A configured chat-completion client bound to one provider and model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send role-tagged messages and return the reply.
    ///
    /// Transport and API failures are returned as `Err`; nothing is retried.
    async fn chat(&self, messages: &[Message]) -> Result<ChatResponse, LlmError>;

    /// The model this client sends requests to.
    fn model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &'static str;
}

/// A configured embedding client.
///
/// Vector width is fixed by the model and stays the same for the client's
/// lifetime.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embed a single text.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmError>;

    /// Embed several texts in one request, one vector per input, in order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError>;

    fn model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &'static str;
}
