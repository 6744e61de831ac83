//! Conversation orchestration: commands, prompt assembly, per-user locking,
//! and the relay service that ties them together.

pub mod command;
pub mod locks;
pub mod prompt;
pub mod service;
