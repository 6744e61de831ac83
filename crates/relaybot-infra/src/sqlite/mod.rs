//! SQLite storage: connection pool and the history repository.

pub mod history;
pub mod pool;
