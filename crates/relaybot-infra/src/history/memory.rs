//! In-memory history repository.
//!
//! Process-lifetime storage used when no durable backend is configured.
//! Records never expire; a restart drops everything.

use std::sync::Arc;

use dashmap::DashMap;
use relaybot_core::history::repository::HistoryRepository;
use relaybot_types::error::RepositoryError;
use relaybot_types::history::Turn;

/// `DashMap`-backed implementation of `HistoryRepository`.
///
/// Cloning shares the same underlying map. Reads clone the stored turns so no
/// map guard outlives the call.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryRepository {
    inner: Arc<DashMap<String, Vec<Turn>>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with stored history.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl HistoryRepository for InMemoryHistoryRepository {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn read(&self, user_id: &str) -> Result<Option<Vec<Turn>>, RepositoryError> {
        Ok(self.inner.get(user_id).map(|r| r.value().clone()))
    }

    async fn write(&self, user_id: &str, turns: &[Turn]) -> Result<(), RepositoryError> {
        self.inner.insert(user_id.to_string(), turns.to_vec());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), RepositoryError> {
        self.inner.remove(user_id);
        Ok(())
    }
}
