//! HTTP clients for OpenAI-compatible APIs.
//!
//! Covers: OpenAI, any local OpenAI-compatible server (MLX, vLLM,
//! llama.cpp), and Azure OpenAI deployments. Also hosts the request helper
//! shared by the other vendor clients.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use llmgate_core::types::Message;

use crate::error::LlmError;
use crate::traits::{ChatModel, ChatResponse, EmbeddingModel, UsageInfo};

/// Default OpenAI API base.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Timeout for chat requests.
pub(crate) const CHAT_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for embedding requests.
pub(crate) const EMBEDDING_TIMEOUT: Duration = Duration::from_secs(60);

// ─────────────────────────────────────────────
// Shared plumbing
// ─────────────────────────────────────────────

/// Build a reqwest client with a request timeout.
pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
            reqwest::Client::new()
        })
}

/// Send a prepared request and decode a JSON success body.
///
/// Non-2xx statuses become [`LlmError::Api`] carrying the response body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, LlmError> {
    let response = request.send().await.map_err(|source| {
        error!(provider, error = %source, "HTTP request failed");
        LlmError::Http { provider, source }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        error!(provider, status = %status, body = %body, "API error");
        return Err(LlmError::Api {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    response.json::<T>().await.map_err(|e| {
        error!(provider, error = %e, "Failed to parse response");
        LlmError::invalid(provider, e.to_string())
    })
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// ─────────────────────────────────────────────
// Endpoint + auth
// ─────────────────────────────────────────────

/// How requests authenticate.
#[derive(Clone)]
enum Auth {
    /// No credentials (e.g. a keyless local server).
    None,
    /// `Authorization: Bearer <key>`.
    Bearer(String),
    /// Azure `api-key: <key>` header.
    AzureKey(String),
}

impl Auth {
    fn bearer(api_key: Option<String>) -> Self {
        match api_key {
            Some(key) if !key.is_empty() => Auth::Bearer(key),
            _ => Auth::None,
        }
    }

    fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Auth::None => request,
            Auth::Bearer(key) => request.bearer_auth(key),
            Auth::AzureKey(key) => request.header("api-key", key),
        }
    }
}

/// Where an OpenAI-style operation lives.
#[derive(Clone)]
struct Endpoint {
    url: String,
    auth: Auth,
}

impl Endpoint {
    /// `{base}/{path}`, bearer auth.
    fn openai(base_url: Option<&str>, path: &str, api_key: Option<String>) -> Self {
        Endpoint {
            url: join_url(base_url.unwrap_or(OPENAI_API_BASE), path),
            auth: Auth::bearer(api_key),
        }
    }

    /// `{endpoint}/openai/deployments/{deployment}/{path}?api-version={v}`, `api-key` auth.
    fn azure(
        endpoint: &str,
        deployment: &str,
        api_version: &str,
        path: &str,
        api_key: String,
    ) -> Self {
        let base = join_url(
            endpoint,
            &format!("openai/deployments/{}", deployment.trim_matches('/')),
        );
        Endpoint {
            url: format!("{}?api-version={}", join_url(&base, path), api_version),
            auth: Auth::AzureKey(api_key),
        }
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print credentials.
        f.debug_struct("Endpoint").field("url", &self.url).finish()
    }
}

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

// ─────────────────────────────────────────────
// OpenAiChat
// ─────────────────────────────────────────────

/// Chat client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiChat {
    client: reqwest::Client,
    endpoint: Endpoint,
    model: String,
    /// `None` leaves the server default in place.
    temperature: Option<f64>,
    display_name: &'static str,
}

impl std::fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("provider", &self.display_name)
            .finish()
    }
}

impl OpenAiChat {
    /// OpenAI official API (or a proxy at `base_url`).
    pub fn openai(model: &str, api_key: Option<String>, base_url: Option<&str>) -> Self {
        Self::with_endpoint(
            "OpenAI",
            Endpoint::openai(base_url, "chat/completions", api_key),
            model,
            None,
        )
    }

    /// A local OpenAI-compatible server.
    pub fn local(model: &str, api_key: Option<String>, base_url: &str) -> Self {
        Self::with_endpoint(
            "Local OpenAI",
            Endpoint::openai(Some(base_url), "chat/completions", api_key),
            model,
            None,
        )
    }

    /// An Azure OpenAI deployment.
    pub fn azure(
        endpoint: &str,
        deployment: &str,
        api_version: &str,
        api_key: String,
        model: &str,
        temperature: Option<f64>,
    ) -> Self {
        Self::with_endpoint(
            "Azure OpenAI",
            Endpoint::azure(endpoint, deployment, api_version, "chat/completions", api_key),
            model,
            temperature,
        )
    }

    fn with_endpoint(
        display_name: &'static str,
        endpoint: Endpoint,
        model: &str,
        temperature: Option<f64>,
    ) -> Self {
        OpenAiChat {
            client: build_client(CHAT_TIMEOUT),
            endpoint,
            model: model.to_string(),
            temperature,
            display_name,
        }
    }

    /// Full request URL.
    pub fn url(&self) -> &str {
        &self.endpoint.url
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn chat(&self, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        debug!(
            provider = self.display_name,
            model = %self.model,
            messages = messages.len(),
            "Calling chat completions"
        );

        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };
        let request = self.endpoint.auth.apply(self.client.post(&self.endpoint.url)).json(&body);
        let resp: ChatCompletionResponse = send_json(self.display_name, request).await?;

        let usage = resp.usage.map(|u| UsageInfo {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        });
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::invalid(self.display_name, "No choices in response"))?;

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &'static str {
        self.display_name
    }
}

// ─────────────────────────────────────────────
// OpenAiEmbeddings
// ─────────────────────────────────────────────

/// Embedding client for OpenAI-compatible `/embeddings` endpoints.
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    endpoint: Endpoint,
    model: String,
    display_name: &'static str,
}

impl std::fmt::Debug for OpenAiEmbeddings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddings")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiEmbeddings {
    pub fn openai(model: &str, api_key: Option<String>, base_url: Option<&str>) -> Self {
        OpenAiEmbeddings {
            client: build_client(EMBEDDING_TIMEOUT),
            endpoint: Endpoint::openai(base_url, "embeddings", api_key),
            model: model.to_string(),
            display_name: "OpenAI",
        }
    }

    /// Azure embeddings; the deployment is named after the model.
    pub fn azure(endpoint: &str, model: &str, api_version: &str, api_key: String) -> Self {
        OpenAiEmbeddings {
            client: build_client(EMBEDDING_TIMEOUT),
            endpoint: Endpoint::azure(endpoint, model, api_version, "embeddings", api_key),
            model: model.to_string(),
            display_name: "Azure OpenAI",
        }
    }

    pub fn url(&self) -> &str {
        &self.endpoint.url
    }
}

#[async_trait]
impl EmbeddingModel for OpenAiEmbeddings {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.embed_documents(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::invalid(self.display_name, "No embedding in response"))
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        debug!(provider = self.display_name, model = %self.model, texts = texts.len(), "Embedding");

        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let request = self.endpoint.auth.apply(self.client.post(&self.endpoint.url)).json(&body);
        let mut resp: EmbeddingResponse = send_json(self.display_name, request).await?;

        resp.data.sort_by_key(|d| d.index);
        Ok(resp.data.into_iter().map(|d| d.embedding).collect())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &'static str {
        self.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
