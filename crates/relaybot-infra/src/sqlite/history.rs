//! SQLite history repository implementation.
//!
//! Implements `HistoryRepository` from `relaybot-core` using sqlx with split
//! read/write pools. Turns are stored as a JSON array per user; expired rows
//! read as absent and are removed lazily.

use chrono::Utc;
use relaybot_core::history::repository::HistoryRepository;
use relaybot_types::error::RepositoryError;
use relaybot_types::history::Turn;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `HistoryRepository`.
pub struct SqliteHistoryRepository {
    pool: DatabasePool,
    ttl_secs: u64,
}

impl SqliteHistoryRepository {
    /// Create a repository backed by the given pool. Every write pushes the
    /// row's expiry `ttl_secs` into the future.
    pub fn new(pool: DatabasePool, ttl_secs: u64) -> Self {
        Self { pool, ttl_secs }
    }

    fn expires_at(&self, now: i64) -> i64 {
        now.saturating_add(i64::try_from(self.ttl_secs).unwrap_or(i64::MAX))
    }

    /// Remove the row only if it is still expired, so a concurrent refresh wins.
    async fn purge_expired(&self, user_id: &str, now: i64) {
        let result = sqlx::query(
            "DELETE FROM conversation_history WHERE user_id = ? AND expires_at <= ?",
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool.writer)
        .await;

        if let Err(e) = result {
            tracing::debug!(user_id, error = %e, "failed to purge expired history row");
        }
    }
}

// ---------------------------------------------------------------------------
// HistoryRepository implementation
// ---------------------------------------------------------------------------

impl HistoryRepository for SqliteHistoryRepository {
    fn backend(&self) -> &str {
        "sqlite"
    }

    async fn read(&self, user_id: &str) -> Result<Option<Vec<Turn>>, RepositoryError> {
        let row = sqlx::query(
            "SELECT turns, expires_at FROM conversation_history WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: i64 = row
            .try_get("expires_at")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let now = Utc::now().timestamp();
        if expires_at <= now {
            self.purge_expired(user_id, now).await;
            return Ok(None);
        }

        let turns_str: String = row
            .try_get("turns")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let turns: Vec<Turn> = serde_json::from_str(&turns_str)
            .map_err(|e| RepositoryError::Serialization(format!("invalid history JSON: {e}")))?;

        Ok(Some(turns))
    }

    async fn write(&self, user_id: &str, turns: &[Turn]) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let turns_str = serde_json::to_string(turns).map_err(|e| {
            RepositoryError::Serialization(format!("failed to serialize history: {e}"))
        })?;

        sqlx::query(
            r#"INSERT INTO conversation_history (user_id, turns, updated_at, expires_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (user_id) DO UPDATE SET
                   turns = excluded.turns,
                   updated_at = excluded.updated_at,
                   expires_at = excluded.expires_at"#,
        )
        .bind(user_id)
        .bind(&turns_str)
        .bind(now.to_rfc3339())
        .bind(self.expires_at(now.timestamp()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM conversation_history WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> (DatabasePool, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("history.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (pool, dir)
    }

    fn exchange(user: &str, assistant: &str) -> Vec<Turn> {
        vec![Turn::user(user), Turn::assistant(assistant)]
    }

    #[tokio::test]
    async fn test_read_missing_user_is_none() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteHistoryRepository::new(pool, 3600);

        assert!(repo.read("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_preserves_order() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteHistoryRepository::new(pool, 3600);

        let mut turns = exchange("こんにちは", "やっほー");
        turns.extend(exchange("元気？", "元気だよ"));
        repo.write("U1", &turns).await.unwrap();

        let stored = repo.read("U1").await.unwrap().unwrap();
        assert_eq!(stored, turns);
    }

    #[tokio::test]
    async fn test_write_replaces_previous_record() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteHistoryRepository::new(pool, 3600);

        repo.write("U1", &exchange("a", "b")).await.unwrap();
        repo.write("U1", &exchange("c", "d")).await.unwrap();

        let stored = repo.read("U1").await.unwrap().unwrap();
        assert_eq!(stored, exchange("c", "d"));
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteHistoryRepository::new(pool, 3600);

        repo.write("alice", &exchange("hi", "hello alice")).await.unwrap();
        repo.write("bob", &exchange("yo", "hello bob")).await.unwrap();
        repo.delete("alice").await.unwrap();

        assert!(repo.read("alice").await.unwrap().is_none());
        assert_eq!(
            repo.read("bob").await.unwrap().unwrap(),
            exchange("yo", "hello bob")
        );
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_noop() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteHistoryRepository::new(pool, 3600);

        repo.delete("ghost").await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_record_reads_as_absent_and_is_purged() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteHistoryRepository::new(pool.clone(), 0);

        repo.write("U1", &exchange("a", "b")).await.unwrap();
        assert!(repo.read("U1").await.unwrap().is_none());

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversation_history")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn test_write_refreshes_expiry() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteHistoryRepository::new(pool.clone(), 3600);

        sqlx::query(
            "INSERT INTO conversation_history (user_id, turns, updated_at, expires_at) VALUES ('U1', '[]', '2000-01-01T00:00:00Z', 1)",
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        repo.write("U1", &exchange("a", "b")).await.unwrap();

        let row: (i64,) =
            sqlx::query_as("SELECT expires_at FROM conversation_history WHERE user_id = 'U1'")
                .fetch_one(&pool.reader)
                .await
                .unwrap();
        assert!(row.0 > Utc::now().timestamp());
    }

    #[tokio::test]
    async fn test_corrupt_json_is_serialization_error() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteHistoryRepository::new(pool.clone(), 3600);

        sqlx::query(
            "INSERT INTO conversation_history (user_id, turns, updated_at, expires_at) VALUES ('U1', 'not json', '2000-01-01T00:00:00Z', ?)",
        )
        .bind(Utc::now().timestamp() + 3600)
        .execute(&pool.writer)
        .await
        .unwrap();

        let err = repo.read("U1").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Serialization(_)));
    }
}
