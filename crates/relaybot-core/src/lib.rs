//! Business logic and port trait definitions for relaybot.
//!
//! This crate defines the "ports" (history repository, completion provider,
//! messaging client) that the infrastructure layer implements, plus the relay
//! orchestration built on top of them. It depends only on `relaybot-types` --
//! never on `relaybot-infra` or any network/database crate.

pub mod history;
pub mod llm;
pub mod messaging;
pub mod relay;
