//! Infrastructure layer for relaybot.
//!
//! Contains implementations of the ports defined in `relaybot-core`:
//! history repositories (in-memory, Redis REST, SQLite), the OpenAI-compatible
//! completion provider, the LINE reply client and webhook signature check,
//! and environment/file configuration loading.

pub mod config;
pub mod history;
pub mod line;
pub mod llm;
pub mod sqlite;
