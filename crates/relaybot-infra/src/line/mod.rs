//! LINE Messaging API: reply client and webhook signature verification.

pub mod client;
pub mod signature;
