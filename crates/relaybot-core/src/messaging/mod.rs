//! Messaging platform abstraction.

pub mod client;
