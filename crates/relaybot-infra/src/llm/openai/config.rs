//! Connection settings for the OpenAI-compatible chat provider.

use secrecy::SecretString;

/// Default public endpoint.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration used to construct an [`super::OpenAiChatProvider`].
///
/// Does not derive `Debug`; the key is only exposed when the client is built.
pub struct OpenAiConfig {
    /// Provider name recorded in logs and spans.
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request leaves `model` empty.
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// OpenAI defaults, optionally pointed at a compatible endpoint.
pub fn openai_defaults(
    api_key: SecretString,
    model: &str,
    base_url: Option<&str>,
    timeout_secs: u64,
) -> OpenAiConfig {
    OpenAiConfig {
        provider_name: relaybot_observe::genai_attrs::PROVIDER_OPENAI.into(),
        base_url: base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
        api_key,
        model: model.into(),
        timeout_secs,
    }
}
