//! Google Generative Language API clients (Gemini chat + embeddings).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use llmgate_core::types::{Message, Role};

use crate::error::LlmError;
use crate::http_provider::{build_client, join_url, send_json, CHAT_TIMEOUT, EMBEDDING_TIMEOUT};
use crate::traits::{ChatModel, ChatResponse, EmbeddingModel, UsageInfo};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Embedding width requested from Gemini, matching `text-embedding-3-small`.
pub const GEMINI_EMBEDDING_DIMENSIONS: u32 = 1536;

/// Task type sent with every embedding request.
pub const GEMINI_EMBEDDING_TASK: &str = "RETRIEVAL_DOCUMENT";

const DISPLAY_NAME: &str = "Google GenAI";

fn model_url(base_url: Option<&str>, model: &str, method: &str) -> String {
    join_url(
        base_url.unwrap_or(GEMINI_API_BASE),
        &format!("v1beta/models/{}:{}", model.trim_start_matches("models/"), method),
    )
}

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&'static str>, text: &str) -> Self {
        Content {
            role,
            parts: vec![Part { text: text.to_string() }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    model: String,
    content: Content,
    task_type: &'static str,
    output_dimensionality: u32,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

// ─────────────────────────────────────────────
// GeminiChat
// ─────────────────────────────────────────────

/// Chat client for Gemini `generateContent`.
pub struct GeminiChat {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    temperature: Option<f64>,
}

impl std::fmt::Debug for GeminiChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiChat")
            .field("url", &self.url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiChat {
    pub fn new(
        model: &str,
        api_key: String,
        base_url: Option<&str>,
        temperature: Option<f64>,
    ) -> Self {
        GeminiChat {
            client: build_client(CHAT_TIMEOUT),
            url: model_url(base_url, model, "generateContent"),
            api_key,
            model: model.to_string(),
            temperature,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_request(&self, messages: &[Message]) -> GenerateRequest {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let contents = messages
            .iter()
            .filter_map(|m| match m.role {
                Role::System => None,
                Role::User => Some(Content::text(Some("user"), &m.content)),
                Role::Assistant => Some(Content::text(Some("model"), &m.content)),
            })
            .collect();

        GenerateRequest {
            contents,
            system_instruction: (!system.is_empty())
                .then(|| Content::text(None, &system.join("\n\n"))),
            generation_config: self.temperature.map(|temperature| GenerationConfig { temperature }),
        }
    }
}

#[async_trait]
impl ChatModel for GeminiChat {
    async fn chat(&self, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        debug!(provider = DISPLAY_NAME, model = %self.model, messages = messages.len(), "Calling generateContent");

        let request = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(messages));
        let resp: GenerateResponse = send_json(DISPLAY_NAME, request).await?;

        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::invalid(DISPLAY_NAME, "No candidates in response"))?;
        let content = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        Ok(ChatResponse {
            content,
            finish_reason: candidate.finish_reason,
            usage: resp.usage_metadata.map(|u| UsageInfo {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
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

// ─────────────────────────────────────────────
// GeminiEmbeddings
// ─────────────────────────────────────────────

/// Embedding client for Gemini `embedContent` / `batchEmbedContents`.
///
/// Always requests [`GEMINI_EMBEDDING_DIMENSIONS`]-wide vectors for
/// [`GEMINI_EMBEDDING_TASK`].
pub struct GeminiEmbeddings {
    client: reqwest::Client,
    base_url: Option<String>,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for GeminiEmbeddings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiEmbeddings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiEmbeddings {
    pub fn new(model: &str, api_key: String, base_url: Option<&str>) -> Self {
        GeminiEmbeddings {
            client: build_client(EMBEDDING_TIMEOUT),
            base_url: base_url.map(String::from),
            api_key,
            model: model.to_string(),
        }
    }

    fn request_for(&self, text: &str) -> EmbedContentRequest {
        EmbedContentRequest {
            model: format!("models/{}", self.model.trim_start_matches("models/")),
            content: Content::text(None, text),
            task_type: GEMINI_EMBEDDING_TASK,
            output_dimensionality: GEMINI_EMBEDDING_DIMENSIONS,
        }
    }
}

#[async_trait]
impl EmbeddingModel for GeminiEmbeddings {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let url = model_url(self.base_url.as_deref(), &self.model, "embedContent");
        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_for(text));
        let resp: EmbedContentResponse = send_json(DISPLAY_NAME, request).await?;
        Ok(resp.embedding.values)
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        debug!(provider = DISPLAY_NAME, model = %self.model, texts = texts.len(), "Embedding batch");

        let url = model_url(self.base_url.as_deref(), &self.model, "batchEmbedContents");
        let body = BatchEmbedRequest {
            requests: texts.iter().map(|t| self.request_for(t)).collect(),
        };
        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body);
        let resp: BatchEmbedResponse = send_json(DISPLAY_NAME, request).await?;
        Ok(resp.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }
}
