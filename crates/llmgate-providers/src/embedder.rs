//! Embedding encoder.
//!
//! [`Embedder::encode`] sends one text through the single-text call and a
//! list through the batch call. Both come back as an [`Embeddings`] matrix
//! so callers never branch on the result shape.

use std::sync::Arc;

use tracing::debug;

use llmgate_core::config::{Config, ConfigError};

use crate::error::LlmError;
use crate::factory::create_embedding_model;
use crate::traits::EmbeddingModel;

/// Input to [`Embedder::encode`].
#[derive(Clone, Debug, PartialEq)]
pub enum EmbedInput {
    Single(String),
    Batch(Vec<String>),
}

impl From<&str> for EmbedInput {
    fn from(text: &str) -> Self {
        EmbedInput::Single(text.to_string())
    }
}

impl From<String> for EmbedInput {
    fn from(text: String) -> Self {
        EmbedInput::Single(text)
    }
}

impl From<Vec<String>> for EmbedInput {
    fn from(texts: Vec<String>) -> Self {
        EmbedInput::Batch(texts)
    }
}

impl From<&[String]> for EmbedInput {
    fn from(texts: &[String]) -> Self {
        EmbedInput::Batch(texts.to_vec())
    }
}

impl From<Vec<&str>> for EmbedInput {
    fn from(texts: Vec<&str>) -> Self {
        EmbedInput::Batch(texts.into_iter().map(String::from).collect())
    }
}

/// Which backend call produced an [`Embeddings`] value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbedPath {
    Single,
    Batch,
}

/// Row-major embedding matrix, one row per input text.
#[derive(Clone, Debug, PartialEq)]
pub struct Embeddings {
    vectors: Vec<Vec<f32>>,
    path: EmbedPath,
}

impl Embeddings {
    /// Number of vectors.
    pub fn rows(&self) -> usize {
        self.vectors.len()
    }

    /// Width of each vector (0 for an empty matrix).
    pub fn dim(&self) -> usize {
        self.vectors.first().map_or(0, Vec::len)
    }

    /// `(rows, dim)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.dim())
    }

    pub fn path(&self) -> EmbedPath {
        self.path
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn as_rows(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn into_rows(self) -> Vec<Vec<f32>> {
        self.vectors
    }

    /// The single vector of a one-row matrix.
    pub fn into_vector(self) -> Option<Vec<f32>> {
        if self.vectors.len() == 1 {
            self.vectors.into_iter().next()
        } else {
            None
        }
    }
}

/// An embedding client that normalizes every result to a matrix.
#[derive(Clone)]
pub struct Embedder {
    model: Arc<dyn EmbeddingModel>,
}

impl std::fmt::Debug for Embedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Embedder")
            .field("provider", &self.model.display_name())
            .field("model", &self.model.model())
            .finish()
    }
}

impl Embedder {
    /// Build the embedding client for the configured provider.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(create_embedding_model(config)?))
    }

    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model()
    }

    /// Embed one text or a batch.
    ///
    /// An empty batch yields an empty matrix without calling the backend.
    pub async fn encode(&self, input: impl Into<EmbedInput>) -> Result<Embeddings, LlmError> {
        match input.into() {
            EmbedInput::Single(text) => {
                debug!(model = %self.model.model(), "Encoding single text");
                let vector = self.model.embed_query(&text).await?;
                Ok(Embeddings {
                    vectors: vec![vector],
                    path: EmbedPath::Single,
                })
            }
            EmbedInput::Batch(texts) => {
                if texts.is_empty() {
                    return Ok(Embeddings {
                        vectors: Vec::new(),
                        path: EmbedPath::Batch,
                    });
                }
                debug!(model = %self.model.model(), texts = texts.len(), "Encoding batch");
                let vectors = self.model.embed_documents(&texts).await?;
                self.check_batch(texts.len(), &vectors)?;
                Ok(Embeddings {
                    vectors,
                    path: EmbedPath::Batch,
                })
            }
        }
    }

    /// Embed one text and return its vector.
    pub async fn encode_one(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.model.embed_query(text).await
    }

    fn check_batch(&self, expected: usize, vectors: &[Vec<f32>]) -> Result<(), LlmError> {
        let provider = self.model.display_name();
        if vectors.len() != expected {
            return Err(LlmError::invalid(
                provider,
                format!("expected {expected} embeddings, got {}", vectors.len()),
            ));
        }
        let dim = vectors.first().map_or(0, Vec::len);
        if let Some(row) = vectors.iter().position(|v| v.len() != dim) {
            return Err(LlmError::invalid(
                provider,
                format!("embedding {row} has width {}, expected {dim}", vectors[row].len()),
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
