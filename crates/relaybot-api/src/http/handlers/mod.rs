//! Route handlers.

pub mod callback;
pub mod health;
