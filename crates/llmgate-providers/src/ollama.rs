//! Ollama embeddings — the local backend for providers that have no
//! embedding API of their own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LlmError;
use crate::http_provider::{build_client, join_url, send_json, EMBEDDING_TIMEOUT};
use crate::traits::EmbeddingModel;

const DISPLAY_NAME: &str = "Ollama";

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum EmbedInput<'a> {
    One(&'a str),
    Many(&'a [String]),
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: EmbedInput<'a>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

/// Embedding client for Ollama's `/api/embed`.
#[derive(Debug)]
pub struct OllamaEmbeddings {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaEmbeddings {
    pub fn new(model: &str, base_url: &str) -> Self {
        OllamaEmbeddings {
            client: build_client(EMBEDDING_TIMEOUT),
            url: join_url(base_url, "api/embed"),
            model: model.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn embed(&self, input: EmbedInput<'_>) -> Result<Vec<Vec<f32>>, LlmError> {
        let body = EmbedRequest {
            model: &self.model,
            input,
        };
        let resp: EmbedResponse = send_json(DISPLAY_NAME, self.client.post(&self.url).json(&body)).await?;
        Ok(resp.embeddings)
    }
}

#[async_trait]
impl EmbeddingModel for OllamaEmbeddings {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.embed(EmbedInput::One(text))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::invalid(DISPLAY_NAME, "No embedding in response"))
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        debug!(provider = DISPLAY_NAME, model = %self.model, texts = texts.len(), "Embedding batch");
        self.embed(EmbedInput::Many(texts)).await
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_url() {
        let emb = OllamaEmbeddings::new("nomic-embed-text", "http://localhost:11434/");
        assert_eq!(emb.url(), "http://localhost:11434/api/embed");
    }

    #[tokio::test]
    async fn test_embed_query_sends_plain_string() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .and(body_json(serde_json::json!({
                "model": "nomic-embed-text",
                "input": "hello"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "nomic-embed-text",
                "embeddings": [[0.25, 0.75]]
            })))
            .mount(&mock_server)
            .await;

        let emb = OllamaEmbeddings::new("nomic-embed-text", &mock_server.uri());
        assert_eq!(emb.embed_query("hello").await.unwrap(), vec![0.25, 0.75]);
    }

    #[tokio::test]
    async fn test_embed_documents_sends_array() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .and(body_json(serde_json::json!({
                "model": "nomic-embed-text",
                "input": ["a", "b", "c"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": [[1.0], [2.0], [3.0]]
            })))
            .mount(&mock_server)
            .await;

        let emb = OllamaEmbeddings::new("nomic-embed-text", &mock_server.uri());
        let texts: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            emb.embed_documents(&texts).await.unwrap(),
            vec![vec![1.0], vec![2.0], vec![3.0]]
        );
    }

    #[tokio::test]
    async fn test_empty_response_is_invalid() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": []
            })))
            .mount(&mock_server)
            .await;

        let emb = OllamaEmbeddings::new("nomic-embed-text", &mock_server.uri());
        let err = emb.embed_query("x").await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse { .. }));
    }
}
