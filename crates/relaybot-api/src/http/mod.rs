//! Webhook HTTP surface.
//!
//! `GET /` answers a health check; `POST /callback` receives signed LINE
//! webhook batches and relays them through the shared relay service.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
