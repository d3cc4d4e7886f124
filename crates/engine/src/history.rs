//! Conversation history normalization.
//!
//! The history arrives as arbitrary JSON from the request payload. Anything
//! that is not an array is treated as "no history". Each element is coerced:
//! role is `assistant` only on an exact match, otherwise `user`; content is
//! turned into text and trimmed; turns left empty are dropped. The bounded
//! result keeps only the most recent turns.

use kbscope_core::message::{ConversationMessage, Role};
use serde_json::Value;
use tracing::debug;

/// Map raw history into canonical messages, preserving order.
pub fn normalize(raw: &Value) -> Vec<ConversationMessage> {
    let Some(items) = raw.as_array() else {
        if !raw.is_null() {
            debug!("History is not an array, ignoring it");
        }
        return Vec::new();
    };

    items.iter().filter_map(normalize_entry).collect()
}

/// Keep the last `max_count` messages in their original order.
pub fn truncate(mut messages: Vec<ConversationMessage>, max_count: usize) -> Vec<ConversationMessage> {
    let skip = messages.len().saturating_sub(max_count);
    messages.split_off(skip)
}

/// [`normalize`] followed by [`truncate`].
pub fn normalize_bounded(raw: &Value, max_count: usize) -> Vec<ConversationMessage> {
    truncate(normalize(raw), max_count)
}

fn normalize_entry(item: &Value) -> Option<ConversationMessage> {
    let role = item
        .get("role")
        .and_then(Value::as_str)
        .map(Role::from_raw)
        .unwrap_or_default();

    let content = item.get("content").map(content_text).unwrap_or_default();
    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    Some(ConversationMessage {
        role,
        content: content.to_string(),
    })
}

fn content_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
