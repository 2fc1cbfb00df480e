//! Anthropic Messages API client.
//!
//! System messages are hoisted into the top-level `system` field; the rest
//! are sent as `user`/`assistant` turns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use llmgate_core::types::{Message, Role};

use crate::error::LlmError;
use crate::http_provider::{build_client, join_url, send_json, CHAT_TIMEOUT};
use crate::traits::{ChatModel, ChatResponse, UsageInfo};

pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The Messages API requires an explicit output cap.
const MAX_TOKENS: u32 = 4096;

const DISPLAY_NAME: &str = "Anthropic";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Turn<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Chat client for Claude models.
pub struct AnthropicChat {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    temperature: Option<f64>,
}

impl std::fmt::Debug for AnthropicChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicChat")
            .field("url", &self.url)
            .field("model", &self.model)
            .finish()
    }
}

impl AnthropicChat {
    pub fn new(
        model: &str,
        api_key: String,
        base_url: Option<&str>,
        temperature: Option<f64>,
    ) -> Self {
        AnthropicChat {
            client: build_client(CHAT_TIMEOUT),
            url: join_url(base_url.unwrap_or(ANTHROPIC_API_BASE), "v1/messages"),
            api_key,
            model: model.to_string(),
            temperature,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_request<'a>(&'a self, messages: &'a [Message]) -> MessagesRequest<'a> {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let turns = messages
            .iter()
            .filter_map(|m| match m.role {
                Role::System => None,
                Role::User => Some(Turn { role: "user", content: &m.content }),
                Role::Assistant => Some(Turn { role: "assistant", content: &m.content }),
            })
            .collect();

        MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            messages: turns,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for AnthropicChat {
    async fn chat(&self, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        debug!(provider = DISPLAY_NAME, model = %self.model, messages = messages.len(), "Calling messages API");

        let request = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.build_request(messages));
        let resp: MessagesResponse = send_json(DISPLAY_NAME, request).await?;

        let content = resp
            .content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref())
            .collect::<String>();

        Ok(ChatResponse {
            content,
            finish_reason: resp.stop_reason,
            usage: resp.usage.map(|u| UsageInfo {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
            }),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }
}
