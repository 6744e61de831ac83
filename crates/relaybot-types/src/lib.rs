//! Shared domain types for relaybot.
//!
//! Conversation turns, LLM request/response shapes, LINE webhook payloads,
//! relay configuration, and the error enums shared across crates.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod history;
pub mod line;
pub mod llm;
