//! History store: trimming and availability policy over any repository.
//!
//! `HistoryStore` never returns an error. Read failures degrade to an empty
//! history, write and delete failures are logged and dropped. Every backend
//! goes through the same [`trim_to_recent`], so prompt construction does not
//! care which one is active.

use relaybot_types::history::Turn;
use tracing::{debug, error};

use super::repository::HistoryRepository;

/// Keep only the most recent `max_turns` exchanges (`2 * max_turns` turns).
///
/// Drops from the front; order is preserved. This is a pure function of
/// length: an odd overflow may split the oldest exchange, and a trailing
/// unmatched turn is always kept because it is the newest.
pub fn trim_to_recent(mut history: Vec<Turn>, max_turns: usize) -> Vec<Turn> {
    let limit = max_turns.saturating_mul(2);
    if history.len() > limit {
        let excess = history.len() - limit;
        history.drain(..excess);
    }
    history
}

/// Bounded per-user history over a [`HistoryRepository`].
pub struct HistoryStore<R: HistoryRepository> {
    repository: R,
    max_turns: usize,
}

impl<R: HistoryRepository> HistoryStore<R> {
    /// Create a store retaining `max_turns` exchanges per user.
    pub fn new(repository: R, max_turns: usize) -> Self {
        Self {
            repository,
            max_turns,
        }
    }

    /// Name of the backing repository.
    pub fn backend(&self) -> &str {
        self.repository.backend()
    }

    /// Load a user's history, oldest first.
    ///
    /// Returns an empty history when nothing is stored or the backend fails.
    /// The result is trimmed too, so lowering `max_turns` takes effect on
    /// records written under a larger limit.
    pub async fn load(&self, user_id: &str) -> Vec<Turn> {
        match self.repository.read(user_id).await {
            Ok(Some(turns)) => trim_to_recent(turns, self.max_turns),
            Ok(None) => Vec::new(),
            Err(e) => {
                error!(user_id, backend = self.backend(), error = %e, "failed to load history");
                Vec::new()
            }
        }
    }

    /// Trim and persist a user's history.
    ///
    /// A history that trims to nothing (only possible with `max_turns = 0`)
    /// deletes the record instead of writing an empty one.
    pub async fn save(&self, user_id: &str, history: Vec<Turn>) {
        let trimmed = trim_to_recent(history, self.max_turns);

        let result = if trimmed.is_empty() {
            self.repository.delete(user_id).await
        } else {
            self.repository.write(user_id, &trimmed).await
        };

        match result {
            Ok(()) => debug!(user_id, turns = trimmed.len(), "history saved"),
            Err(e) => {
                error!(user_id, backend = self.backend(), error = %e, "failed to save history")
            }
        }
    }

    /// Delete a user's history. Idempotent.
    pub async fn clear(&self, user_id: &str) {
        if let Err(e) = self.repository.delete(user_id).await {
            error!(user_id, backend = self.backend(), error = %e, "failed to clear history");
        }
    }
}
