//! Prompt assembly and reply shaping.

use relaybot_types::config::RelayConfig;
use relaybot_types::history::Turn;
use relaybot_types::llm::{CompletionRequest, Message};

/// Build the completion request: system directive, then history oldest
/// first, then the new user turn.
pub fn build_request(config: &RelayConfig, history: &[Turn], user_text: &str) -> CompletionRequest {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(config.system_prompt.clone()));
    messages.extend(history.iter().map(Message::from));
    messages.push(Message::user(user_text));

    CompletionRequest {
        model: config.model.clone(),
        messages,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}

/// Truncate to at most `max_chars` Unicode scalar values.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
