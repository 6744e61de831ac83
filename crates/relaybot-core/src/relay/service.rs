//! Relay service orchestrating one webhook event end to end.
//!
//! For a text message: resolve the sender, handle the reset command, or load
//! history, ask the completion provider, record the exchange, and reply.
//! Completion failures never reach the caller; they become the configured
//! fallback text, which is also what gets recorded as the assistant turn.

use futures_util::future::join_all;
use relaybot_types::config::RelayConfig;
use relaybot_types::error::MessagingError;
use relaybot_types::history::Turn;
use relaybot_types::line::WebhookEvent;
use tracing::{debug, error, info, warn};

use crate::history::repository::HistoryRepository;
use crate::history::store::HistoryStore;
use crate::llm::provider::LlmProvider;
use crate::messaging::client::MessagingClient;
use crate::relay::command::Command;
use crate::relay::locks::UserLocks;
use crate::relay::prompt::{build_request, truncate_chars};

/// Errors that fail an event (and therefore the whole batch).
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Messaging(#[from] MessagingError),
}

/// How the reply text was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// History cleared; the model was not called.
    Reset,
    /// Text generated by the completion provider.
    Generated,
    /// The provider answered with no text.
    Empty,
    /// The provider call failed.
    Fallback,
}

/// The text to send back and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub text: String,
    pub kind: ReplyKind,
}

/// Why an event was not relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not a message event.
    UnsupportedEvent,
    /// A message, but not text (sticker, image, ...).
    NonText,
    /// No user id on the event source.
    NoUser,
    /// No reply token (standby mode); nothing could be sent back.
    NoReplyToken,
}

/// Result of handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Replied(RelayReply),
    Skipped(SkipReason),
}

/// Counts for one webhook batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub replied: usize,
    pub skipped: usize,
}

/// Orchestrates history, completion, and reply for inbound events.
///
/// Generic over the repository, provider, and messaging ports so that
/// relaybot-core never depends on relaybot-infra.
pub struct RelayService<R: HistoryRepository, L: LlmProvider, M: MessagingClient> {
    history: HistoryStore<R>,
    llm: L,
    messaging: M,
    config: RelayConfig,
    locks: UserLocks,
}

impl<R: HistoryRepository, L: LlmProvider, M: MessagingClient> RelayService<R, L, M> {
    /// Create a relay over the given ports. History depth comes from `config`.
    pub fn new(repository: R, llm: L, messaging: M, config: RelayConfig) -> Self {
        Self {
            history: HistoryStore::new(repository, config.max_turns),
            llm,
            messaging,
            config,
            locks: UserLocks::new(),
        }
    }

    /// Access the history store.
    pub fn history(&self) -> &HistoryStore<R> {
        &self.history
    }

    /// Handle every event of a webhook delivery concurrently, then join.
    ///
    /// No ordering is guaranteed between events. All events run to completion
    /// even if one fails; the first failure is returned afterwards so the
    /// caller can reject the whole batch.
    pub async fn handle_batch(&self, events: &[WebhookEvent]) -> Result<BatchSummary, RelayError> {
        let results = join_all(events.iter().map(|event| self.handle_event(event))).await;

        let mut summary = BatchSummary::default();
        let mut first_error = None;
        for result in results {
            match result {
                Ok(EventOutcome::Replied(_)) => summary.replied += 1,
                Ok(EventOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!(error = %e, "event failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }

    /// Handle one webhook event: relay text messages, skip everything else.
    pub async fn handle_event(&self, event: &WebhookEvent) -> Result<EventOutcome, RelayError> {
        let WebhookEvent::Message(message) = event else {
            debug!("skipping non-message event");
            return Ok(EventOutcome::Skipped(SkipReason::UnsupportedEvent));
        };
        let Some(text) = message.text() else {
            debug!("skipping non-text message");
            return Ok(EventOutcome::Skipped(SkipReason::NonText));
        };
        let Some(user_id) = message.user_id() else {
            warn!("skipping text message without a user id");
            return Ok(EventOutcome::Skipped(SkipReason::NoUser));
        };
        let Some(reply_token) = message.reply_token.as_deref() else {
            debug!(user_id, "skipping text message without a reply token");
            return Ok(EventOutcome::Skipped(SkipReason::NoReplyToken));
        };

        let reply = self.respond(user_id, text).await;
        self.messaging.reply_text(reply_token, &reply.text).await?;
        debug!(
            user_id,
            platform = self.messaging.platform(),
            kind = ?reply.kind,
            "reply sent"
        );

        Ok(EventOutcome::Replied(reply))
    }

    /// Produce the reply for `text` from `user_id`, updating history.
    ///
    /// Runs under the user's lock, so concurrent messages from one user are
    /// applied one after another.
    pub async fn respond(&self, user_id: &str, text: &str) -> RelayReply {
        let _guard = self.locks.acquire(user_id).await;

        match Command::parse(text, &self.config) {
            Command::Reset => {
                self.history.clear(user_id).await;
                info!(user_id, "history reset");
                RelayReply {
                    text: self.config.reset_reply.clone(),
                    kind: ReplyKind::Reset,
                }
            }
            Command::Chat(text) => self.chat(user_id, text).await,
        }
    }

    async fn chat(&self, user_id: &str, text: &str) -> RelayReply {
        let mut history = self.history.load(user_id).await;
        let request = build_request(&self.config, &history, text);

        let reply = match self.llm.complete(&request).await {
            Ok(response) => match response.content.as_deref() {
                Some(content) if !content.is_empty() => RelayReply {
                    text: truncate_chars(content, self.config.max_reply_chars).to_string(),
                    kind: ReplyKind::Generated,
                },
                _ => {
                    warn!(user_id, response_id = %response.id, "completion returned no text");
                    RelayReply {
                        text: self.config.empty_reply.clone(),
                        kind: ReplyKind::Empty,
                    }
                }
            },
            Err(e) => {
                error!(user_id, provider = self.llm.name(), error = %e, "completion failed");
                RelayReply {
                    text: self.config.fallback_reply.clone(),
                    kind: ReplyKind::Fallback,
                }
            }
        };

        history.push(Turn::user(text));
        history.push(Turn::assistant(reply.text.clone()));
        self.history.save(user_id, history).await;

        reply
    }
}
