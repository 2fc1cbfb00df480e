//! In-memory model clients shared by unit tests.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use llmgate_core::types::Message;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::error::LlmError;
use crate::traits::{ChatModel, ChatResponse, EmbeddingModel};

/// A mock chat model that returns canned replies in sequence.
pub(crate) struct MockChat {
    /// `Ok(text)` for a reply, `Err(status)` for an API failure.
    replies: Mutex<Vec<Result<String, u16>>>,
    /// Messages of every call, in order.
    pub(crate) seen: Mutex<Vec<Vec<Message>>>,
}

impl MockChat {
    pub(crate) fn new(replies: Vec<Result<String, u16>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn simple(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub(crate) fn failing(status: u16) -> Self {
        Self::new(vec![Err(status)])
    }

    pub(crate) fn last_messages(&self) -> Vec<Message> {
        self.seen.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for MockChat {
    async fn chat(&self, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.is_empty() {
            Ok("(no more responses)".to_string())
        } else {
            replies.remove(0)
        };
        match reply {
            Ok(text) => Ok(ChatResponse::text(text)),
            Err(status) => Err(LlmError::Api {
                provider: "Mock",
                status,
                body: "mock failure".into(),
            }),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn display_name(&self) -> &'static str {
        "Mock"
    }
}

/// A mock embedding model producing `dim`-wide vectors derived from text length.
pub(crate) struct MockEmbeddings {
    dim: usize,
    /// Replaces every batch result when set.
    batch_override: Option<Vec<Vec<f32>>>,
    pub(crate) query_calls: AtomicUsize,
    pub(crate) batch_calls: AtomicUsize,
}

impl MockEmbeddings {
    pub(crate) fn new(dim: usize) -> Self {
        Self {
            dim,
            batch_override: None,
            query_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_batch(rows: Vec<Vec<f32>>) -> Self {
        Self {
            batch_override: Some(rows),
            ..Self::new(0)
        }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        (0..self.dim).map(|i| (text.len() + i) as f32).collect()
    }
}

#[async_trait]
impl EmbeddingModel for MockEmbeddings {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector(text))
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(rows) = &self.batch_override {
            return Ok(rows.clone());
        }
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn model(&self) -> &str {
        "mock-embed"
    }

    fn display_name(&self) -> &'static str {
        "Mock"
    }
}

// ─────────────────────────────────────────────
// Log capture
// ─────────────────────────────────────────────

/// Records the full `message` of every event, newlines included.
#[derive(Clone, Default)]
pub(crate) struct CapturedMessages(Arc<Mutex<Vec<String>>>);

impl CapturedMessages {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct MessageVisitor<'a>(&'a mut Option<String>);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedMessages {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = None;
        event.record(&mut MessageVisitor(&mut message));
        if let Some(message) = message {
            self.0.lock().unwrap().push(message);
        }
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
pub(crate) fn capture_messages<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let capture = CapturedMessages::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.messages())
}
