//! Per-user conversation history.
//!
//! `HistoryRepository` is the storage port; `HistoryStore` wraps any
//! repository with the trimming and failure-swallowing policy shared by every
//! backend.

pub mod box_repository;
pub mod repository;
pub mod store;
