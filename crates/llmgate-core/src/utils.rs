//! Utility helpers — data paths and log previews.

use std::path::PathBuf;

use crate::types::ChatInput;

/// Preview length for plain text and whole responses.
pub const PREVIEW_LEN: usize = 100;

/// Preview length for each message when previewing a message list.
pub const MESSAGE_PREVIEW_LEN: usize = 50;

/// How many messages of a list are previewed.
pub const PREVIEW_MESSAGES: usize = 2;

/// Get the llmgate data directory (e.g. `~/.llmgate/`).
pub fn get_data_path() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".llmgate")
}

/// Truncate `text` to its first `max_len` characters followed by `...`.
///
/// Text at or under the limit is returned unchanged. Counts chars, not
/// bytes, so multi-byte text is never split.
pub fn truncate_preview(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Render an invoker input for the `Input:` log line.
pub fn preview_input(input: &ChatInput) -> String {
    match input {
        ChatInput::Text(text) => truncate_preview(text, PREVIEW_LEN),
        ChatInput::Messages(messages) => messages
            .iter()
            .take(PREVIEW_MESSAGES)
            .map(|m| {
                format!(
                    "{}: {}",
                    m.role,
                    truncate_preview(&m.content, MESSAGE_PREVIEW_LEN)
                )
            })
            .collect::<Vec<_>>()
            .join(" | "),
        ChatInput::Prompt(prompt) => truncate_preview(&prompt.to_string(), PREVIEW_LEN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, PromptValue};

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_preview("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate_preview("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        let text = "a".repeat(150);
        let preview = truncate_preview(&text, 100);
        assert_eq!(preview, format!("{}...", "a".repeat(100)));
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate_preview("こんにちは世界です", 5), "こんにちは...");
    }

    #[test]
    fn test_preview_plain_text() {
        let input = ChatInput::Text("x".repeat(101));
        assert_eq!(preview_input(&input), format!("{}...", "x".repeat(100)));
    }

    #[test]
    fn test_preview_messages_first_two_only() {
        let input = ChatInput::Messages(vec![
            Message::system("s".repeat(60)),
            Message::user("short question"),
            Message::assistant("never shown"),
        ]);
        assert_eq!(
            preview_input(&input),
            format!("system: {}... | user: short question", "s".repeat(50))
        );
    }

    #[test]
    fn test_preview_empty_messages() {
        assert_eq!(preview_input(&ChatInput::Messages(vec![])), "");
    }

    #[test]
    fn test_preview_prompt_value() {
        let input = ChatInput::Prompt(PromptValue::new(vec![Message::user("Hi")]));
        assert_eq!(preview_input(&input), "Human: Hi");
    }

    #[test]
    fn test_data_path_ends_with_llmgate() {
        assert!(get_data_path().ends_with(".llmgate"));
    }
}
