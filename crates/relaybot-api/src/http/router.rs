//! Axum router configuration with middleware.
//!
//! Routes: `GET /` (health) and `POST /callback` (LINE webhook).
//! Middleware: request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the webhook router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::health))
        .route("/callback", post(handlers::callback::callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
