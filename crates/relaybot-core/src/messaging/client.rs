//! MessagingClient trait definition.
//!
//! The relay replies through this port; the LINE implementation lives in
//! relaybot-infra.

use relaybot_types::error::MessagingError;

/// Trait for sending replies back to the messaging platform.
pub trait MessagingClient: Send + Sync {
    /// Platform name for logs (e.g., "line").
    fn platform(&self) -> &str;

    /// Send a single text reply using the one-time token from the inbound event.
    fn reply_text(
        &self,
        reply_token: &str,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), MessagingError>> + Send;
}
