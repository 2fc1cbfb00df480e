//! Structured JSON extraction from free-form model output.
//!
//! A reply is searched for a ```` ```json ```` fenced block first; when
//! there is none the whole reply is parsed. Every failure is logged with
//! the raw text and reported as `None`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info, warn};

use llmgate_core::types::Message;

use crate::llm::Llm;

/// User message sent when the caller supplies no user prompt.
pub const EMPTY_USER_PLACEHOLDER: &str = "strictly follow system prompt";

static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```json\s*(.*?)```").expect("JSON fence pattern is valid")
});

/// Why a reply did not yield a JSON object.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("fenced JSON block is not valid JSON: {0}")]
    FencedBlock(#[source] serde_json::Error),

    #[error("response is not valid JSON: {0}")]
    WholeText(#[source] serde_json::Error),

    #[error("JSON value is {0}, not an object")]
    NotAnObject(&'static str),
}

/// The two-message prompt for a JSON request.
pub fn build_json_prompt(system_prompt: &str, user_prompt: &str) -> Vec<Message> {
    let user = if user_prompt.is_empty() {
        EMPTY_USER_PLACEHOLDER
    } else {
        user_prompt
    };
    vec![Message::system(system_prompt), Message::user(user)]
}

/// Parse a JSON object out of `raw` without logging.
pub fn parse_json(raw: &str) -> Result<Map<String, Value>, ExtractError> {
    let value = match JSON_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(block) => {
            serde_json::from_str::<Value>(block.as_str()).map_err(ExtractError::FencedBlock)?
        }
        None => serde_json::from_str::<Value>(raw).map_err(ExtractError::WholeText)?,
    };
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ExtractError::NotAnObject(kind(&other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Extract a JSON object from a model reply.
///
/// Returns `None` on any failure, after logging the full raw text.
pub fn extract_json_from_text(raw: &str) -> Option<Map<String, Value>> {
    if JSON_FENCE.is_match(raw) {
        info!("Successfully extracted JSON block from LLM response.");
    } else {
        warn!("No JSON block found in LLM response. Attempting to parse entire response.");
    }

    match parse_json(raw) {
        Ok(map) => Some(map),
        Err(e) => {
            error!(error = %e, "{}", parse_failure_message(raw));
            None
        }
    }
}

fn parse_failure_message(raw: &str) -> String {
    format!("Failed to parse LLM response as JSON. Content:\n{raw}")
}

/// Ask `llm` for a JSON object and parse the reply.
///
/// An empty `user_prompt` is replaced with [`EMPTY_USER_PLACEHOLDER`].
/// Invocation errors are logged and reported as `None`.
pub async fn extract_json(
    system_prompt: &str,
    user_prompt: &str,
    llm: &Llm,
) -> Option<Map<String, Value>> {
    info!("Sending request to LLM (model: {})...", llm.model_name());

    let raw = match llm.invoke(build_json_prompt(system_prompt, user_prompt)).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("Error during LLM completion or JSON parsing: {}", e);
            return None;
        }
    };
    info!("Received response from LLM.");

    extract_json_from_text(&raw)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
