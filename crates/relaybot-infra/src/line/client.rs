//! LineMessagingClient -- [`MessagingClient`] for the LINE Messaging API.
//!
//! Replies go to `POST {base}/v2/bot/message/reply` with the channel access
//! token as a bearer credential. The token is wrapped in [`SecretString`] and
//! never logged.

use std::time::Duration;

use relaybot_core::messaging::client::MessagingClient;
use relaybot_types::error::MessagingError;
use relaybot_types::line::{OutboundMessage, ReplyRequest};
use secrecy::{ExposeSecret, SecretString};

/// Public LINE API endpoint.
pub const LINE_API_BASE: &str = "https://api.line.me";

/// LINE reply client.
///
/// Built even when no access token is configured so the webhook can still be
/// served; every reply then fails with [`MessagingError::NotConfigured`].
pub struct LineMessagingClient {
    client: reqwest::Client,
    access_token: Option<SecretString>,
    base_url: String,
}

impl LineMessagingClient {
    /// Create a client for the public LINE API.
    ///
    /// # Errors
    ///
    /// Returns `MessagingError::Transport` if the HTTP client cannot be built.
    pub fn new(access_token: Option<SecretString>, timeout: Duration) -> Result<Self, MessagingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MessagingError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            access_token,
            base_url: LINE_API_BASE.to_string(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn reply_url(&self) -> String {
        format!("{}/v2/bot/message/reply", self.base_url)
    }
}

impl MessagingClient for LineMessagingClient {
    fn platform(&self) -> &str {
        "line"
    }

    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), MessagingError> {
        let token = self.access_token.as_ref().ok_or_else(|| {
            MessagingError::NotConfigured("LINE_CHANNEL_ACCESS_TOKEN is not set".to_string())
        })?;

        let body = ReplyRequest {
            reply_token: reply_token.to_string(),
            messages: vec![OutboundMessage::text(text)],
        };

        let response = self
            .client
            .post(self.reply_url())
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| MessagingError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), chars = text.chars().count(), "reply sent");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MessagingError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
