//! Core types for llmgate — chat messages and the closed set of inputs
//! accepted by the invoker.
//!
//! Callers hand the invoker a plain string, a list of role-tagged messages,
//! or an already-rendered prompt. Each variant normalizes to `Vec<Message>`
//! before it reaches a provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ─────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────

/// Speaker role of a chat message.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Label used when a prompt is rendered as a single string.
    fn prompt_label(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "Human",
            Role::Assistant => "AI",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role string is not one of the known aliases.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown message role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts `system`, `user`/`human`, `assistant`/`ai` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Role::System),
            "user" | "human" => Ok(Role::User),
            "assistant" | "ai" => Ok(Role::Assistant),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// A single role-tagged chat message.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::new(Role::Assistant, content)
    }
}

impl TryFrom<(&str, &str)> for Message {
    type Error = UnknownRole;

    fn try_from((role, content): (&str, &str)) -> Result<Self, Self::Error> {
        Ok(Message::new(role.parse()?, content))
    }
}

// ─────────────────────────────────────────────
// Structured prompts
// ─────────────────────────────────────────────

/// An already-rendered prompt: an ordered list of messages produced by a
/// template or prompt builder.
///
/// Its string form matches the conventional chat transcript rendering
/// (`System: ...\nHuman: ...\nAI: ...`) and is what gets previewed in logs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PromptValue {
    messages: Vec<Message>,
}

impl PromptValue {
    pub fn new(messages: Vec<Message>) -> Self {
        PromptValue { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

impl fmt::Display for PromptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, msg) in self.messages.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: {}", msg.role.prompt_label(), msg.content)?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Invoker input
// ─────────────────────────────────────────────

/// Everything the invoker accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum ChatInput {
    /// A bare prompt, sent as one user message.
    Text(String),
    /// Role-tagged messages, sent as-is.
    Messages(Vec<Message>),
    /// A rendered prompt template.
    Prompt(PromptValue),
}

impl ChatInput {
    /// Normalize into the canonical message list sent to a provider.
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            ChatInput::Text(text) => vec![Message::user(text)],
            ChatInput::Messages(messages) => messages,
            ChatInput::Prompt(prompt) => prompt.into_messages(),
        }
    }
}

impl From<&str> for ChatInput {
    fn from(text: &str) -> Self {
        ChatInput::Text(text.to_string())
    }
}

impl From<String> for ChatInput {
    fn from(text: String) -> Self {
        ChatInput::Text(text)
    }
}

impl From<Vec<Message>> for ChatInput {
    fn from(messages: Vec<Message>) -> Self {
        ChatInput::Messages(messages)
    }
}

impl From<&[Message]> for ChatInput {
    fn from(messages: &[Message]) -> Self {
        ChatInput::Messages(messages.to_vec())
    }
}

impl From<PromptValue> for ChatInput {
    fn from(prompt: PromptValue) -> Self {
        ChatInput::Prompt(prompt)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
