//! Token estimation utilities.
//!
//! Uses a character-based heuristic: ~4 characters per token. Only used for
//! diagnostics (log fields, CLI output); nothing in the pipeline is cut on
//! token counts.

use kbscope_core::message::ConversationMessage;

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 characters. Rounds up.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Estimate tokens for a single message including per-message overhead.
///
/// Each message costs ~4 tokens of overhead for role name and delimiters.
pub fn estimate_message_tokens(message: &ConversationMessage) -> usize {
    let overhead = 4;
    overhead + estimate_tokens(&message.content)
}

/// Estimate tokens for a slice of messages.
pub fn estimate_messages_tokens(messages: &[ConversationMessage]) -> usize {
    messages.iter().map(estimate_message_tokens).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn five_chars_rounds_up() {
        assert_eq!(estimate_tokens("hello"), 2);
    }

    #[test]
    fn messages_include_overhead() {
        let msgs = vec![
            ConversationMessage::user("test"),       // 1 + 4
            ConversationMessage::assistant("hello"), // 2 + 4
        ];
        assert_eq!(estimate_messages_tokens(&msgs), 11);
    }
}
