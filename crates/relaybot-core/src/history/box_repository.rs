//! BoxHistoryRepository -- object-safe dynamic dispatch wrapper for HistoryRepository.
//!
//! 1. Define an object-safe `HistoryRepositoryDyn` trait with boxed futures
//! 2. Blanket-impl `HistoryRepositoryDyn` for all `T: HistoryRepository`
//! 3. `BoxHistoryRepository` wraps `Box<dyn HistoryRepositoryDyn>` and delegates
//!
//! The backend is chosen once at startup from configuration; everything
//! downstream holds a `BoxHistoryRepository` and never branches on it.

use std::future::Future;
use std::pin::Pin;

use relaybot_types::error::RepositoryError;
use relaybot_types::history::Turn;

use super::repository::HistoryRepository;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`HistoryRepository`] with boxed futures.
pub trait HistoryRepositoryDyn: Send + Sync {
    fn backend_dyn(&self) -> &str;

    fn read_boxed<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Vec<Turn>>, RepositoryError>>;

    fn write_boxed<'a>(
        &'a self,
        user_id: &'a str,
        turns: &'a [Turn],
    ) -> BoxFuture<'a, Result<(), RepositoryError>>;

    fn delete_boxed<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<(), RepositoryError>>;
}

/// Blanket implementation: any `HistoryRepository` automatically implements `HistoryRepositoryDyn`.
impl<T: HistoryRepository> HistoryRepositoryDyn for T {
    fn backend_dyn(&self) -> &str {
        HistoryRepository::backend(self)
    }

    fn read_boxed<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Vec<Turn>>, RepositoryError>> {
        Box::pin(self.read(user_id))
    }

    fn write_boxed<'a>(
        &'a self,
        user_id: &'a str,
        turns: &'a [Turn],
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(self.write(user_id, turns))
    }

    fn delete_boxed<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(self.delete(user_id))
    }
}

/// Type-erased history repository for runtime backend selection.
pub struct BoxHistoryRepository {
    inner: Box<dyn HistoryRepositoryDyn + Send + Sync>,
}

impl BoxHistoryRepository {
    /// Wrap a concrete `HistoryRepository` in a type-erased box.
    pub fn new<T: HistoryRepository + 'static>(repository: T) -> Self {
        Self {
            inner: Box::new(repository),
        }
    }
}

impl HistoryRepository for BoxHistoryRepository {
    fn backend(&self) -> &str {
        self.inner.backend_dyn()
    }

    async fn read(&self, user_id: &str) -> Result<Option<Vec<Turn>>, RepositoryError> {
        self.inner.read_boxed(user_id).await
    }

    async fn write(&self, user_id: &str, turns: &[Turn]) -> Result<(), RepositoryError> {
        self.inner.write_boxed(user_id, turns).await
    }

    async fn delete(&self, user_id: &str) -> Result<(), RepositoryError> {
        self.inner.delete_boxed(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct VecRepository {
        turns: Mutex<Option<Vec<Turn>>>,
    }

    impl HistoryRepository for VecRepository {
        fn backend(&self) -> &str {
            "vec"
        }

        async fn read(&self, _user_id: &str) -> Result<Option<Vec<Turn>>, RepositoryError> {
            Ok(self.turns.lock().unwrap().clone())
        }

        async fn write(&self, _user_id: &str, turns: &[Turn]) -> Result<(), RepositoryError> {
            *self.turns.lock().unwrap() = Some(turns.to_vec());
            Ok(())
        }

        async fn delete(&self, _user_id: &str) -> Result<(), RepositoryError> {
            *self.turns.lock().unwrap() = None;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_box_delegates_to_inner() {
        let boxed = BoxHistoryRepository::new(VecRepository::default());
        assert_eq!(boxed.backend(), "vec");
        assert!(boxed.read("u").await.unwrap().is_none());

        boxed.write("u", &[Turn::user("hi")]).await.unwrap();
        assert_eq!(boxed.read("u").await.unwrap(), Some(vec![Turn::user("hi")]));

        boxed.delete("u").await.unwrap();
        assert!(boxed.read("u").await.unwrap().is_none());
    }
}
