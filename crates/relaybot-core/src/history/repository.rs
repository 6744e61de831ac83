//! History repository trait.
//!
//! Defines the storage port for per-user conversation history.
//! Implementations live in relaybot-infra (in-memory, Redis REST, SQLite).

use relaybot_types::error::RepositoryError;
use relaybot_types::history::Turn;

/// Trait for per-user history persistence.
///
/// Repositories store exactly what they are given; trimming and the
/// "never fail the caller" policy live in [`super::store::HistoryStore`].
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait HistoryRepository: Send + Sync {
    /// Short backend name for logs (e.g., "memory", "redis", "sqlite").
    fn backend(&self) -> &str;

    /// Read the stored turns for a user. Returns None if nothing is stored
    /// (or the record has expired).
    fn read(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<Turn>>, RepositoryError>> + Send;

    /// Replace the stored turns for a user (upsert). Durable backends refresh
    /// the record's expiration on every write.
    fn write(
        &self,
        user_id: &str,
        turns: &[Turn],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete everything stored for a user. No-op if nothing is stored.
    fn delete(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Durable key for a user's history record.
pub fn history_key(user_id: &str) -> String {
    format!("history:{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_key_uses_user_id_verbatim() {
        assert_eq!(history_key("U4af4980629"), "history:U4af4980629");
        assert_eq!(history_key("a:b"), "history:a:b");
    }
}
