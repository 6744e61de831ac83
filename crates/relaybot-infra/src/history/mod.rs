//! History repository implementations and backend selection.
//!
//! The backend is chosen once at startup (see
//! [`crate::config::ServiceEnv::history_backend`]) and erased into a
//! [`BoxHistoryRepository`] so the rest of the service never branches on it.

pub mod memory;
pub mod redis_rest;

use std::time::Duration;

use relaybot_core::history::box_repository::BoxHistoryRepository;
use relaybot_types::config::RelayConfig;
use relaybot_types::error::RepositoryError;
use secrecy::SecretString;

use crate::sqlite::history::SqliteHistoryRepository;
use crate::sqlite::pool::DatabasePool;

use self::memory::InMemoryHistoryRepository;
use self::redis_rest::RedisRestHistoryRepository;

/// Which history backend to build.
#[derive(Debug)]
pub enum HistoryBackendChoice {
    /// Redis reached over its REST interface.
    Redis { url: String, token: SecretString },
    /// Local SQLite database file.
    Sqlite { database_url: String },
    /// Process-lifetime map.
    Memory,
}

impl HistoryBackendChoice {
    pub fn name(&self) -> &'static str {
        match self {
            HistoryBackendChoice::Redis { .. } => "redis",
            HistoryBackendChoice::Sqlite { .. } => "sqlite",
            HistoryBackendChoice::Memory => "memory",
        }
    }
}

/// Construct the selected backend.
///
/// # Errors
///
/// Fails if the HTTP client cannot be built or the SQLite database cannot be
/// opened and migrated.
pub async fn build_history_repository(
    choice: HistoryBackendChoice,
    config: &RelayConfig,
) -> Result<BoxHistoryRepository, RepositoryError> {
    let repository = match choice {
        HistoryBackendChoice::Redis { url, token } => {
            tracing::info!(backend = "redis", "history persistence enabled");
            BoxHistoryRepository::new(RedisRestHistoryRepository::new(
                url,
                token,
                config.history_ttl_secs,
                Duration::from_secs(config.request_timeout_secs),
            )?)
        }
        HistoryBackendChoice::Sqlite { database_url } => {
            let pool = DatabasePool::new(&database_url)
                .await
                .map_err(|e| RepositoryError::Connection(e.to_string()))?;
            tracing::info!(backend = "sqlite", url = %database_url, "history persistence enabled");
            BoxHistoryRepository::new(SqliteHistoryRepository::new(pool, config.history_ttl_secs))
        }
        HistoryBackendChoice::Memory => {
            tracing::info!(
                backend = "memory",
                "no durable history backend configured; history is lost on restart"
            );
            BoxHistoryRepository::new(InMemoryHistoryRepository::new())
        }
    };

    Ok(repository)
}
