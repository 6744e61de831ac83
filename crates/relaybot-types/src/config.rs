//! Relay configuration types.
//!
//! `RelayConfig` is the optional `relaybot.toml` that controls history depth,
//! model selection, persona, and the fixed reply texts. Every field has a
//! default, so an empty file (or no file) yields a working configuration.

use serde::{Deserialize, Serialize};

/// Number of exchanges (user + assistant pairs) retained per user.
pub const DEFAULT_MAX_TURNS: usize = 6;

/// Expiration applied to durable history records on every write (7 days).
pub const DEFAULT_HISTORY_TTL_SECS: u64 = 60 * 60 * 24 * 7;

/// Maximum characters of generated text relayed back to the user.
pub const DEFAULT_MAX_REPLY_CHARS: usize = 2000;

/// Top-level relay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Exchanges kept per user. `0` disables history (single-turn mode).
    pub max_turns: usize,

    /// TTL for durable history records, refreshed on every save.
    pub history_ttl_secs: u64,

    /// Completion model identifier.
    pub model: String,

    /// Optional cap on generated tokens.
    pub max_tokens: Option<u32>,

    /// Optional sampling temperature.
    pub temperature: Option<f64>,

    /// Generated text is truncated to this many characters before replying.
    pub max_reply_chars: usize,

    /// Fixed system directive placed first in every prompt.
    pub system_prompt: String,

    /// Exact-match vocabulary that clears history instead of chatting.
    pub reset_keywords: Vec<String>,

    /// Acknowledgment sent after a reset.
    pub reset_reply: String,

    /// Sent (and recorded) when the model returns no text.
    pub empty_reply: String,

    /// Sent (and recorded) when the completion call fails.
    pub fallback_reply: String,

    /// Timeout applied to outbound HTTP clients.
    pub request_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            history_ttl_secs: DEFAULT_HISTORY_TTL_SECS,
            model: "gpt-4o-mini".to_string(),
            max_tokens: None,
            temperature: None,
            max_reply_chars: DEFAULT_MAX_REPLY_CHARS,
            system_prompt: "あなたは甘えん坊で可愛い擬似彼女。標準語で、絵文字や軽いツッコミを交え、相手を励ましつつ甘やかす。下品になりすぎない。返事は短め〜中くらい。".to_string(),
            reset_keywords: vec!["/reset".to_string(), "リセット".to_string()],
            reset_reply: "履歴リセットしたよ。あらためてよろしくね💞".to_string(),
            empty_reply: "うまく返せなかった…もう一回言って！".to_string(),
            fallback_reply: "サーバーがちょっと混んでるみたい…少しだけ待ってもう一度送ってみてね🥺".to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl RelayConfig {
    /// Whether `text` (already trimmed) is a reset command.
    pub fn is_reset_keyword(&self, text: &str) -> bool {
        self.reset_keywords.iter().any(|k| k == text)
    }
}
