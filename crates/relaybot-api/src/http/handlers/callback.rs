//! LINE webhook receiver.

use axum::extract::State;
use axum::http::StatusCode;

use relaybot_types::line::WebhookPayload;

use crate::http::error::AppError;
use crate::http::extractors::signature::VerifiedBody;
use crate::state::AppState;

/// POST /callback - Receive a signed webhook batch.
///
/// Every event of the batch is handled concurrently and joined before the
/// response is sent. A body that is not a webhook batch, or any failed event,
/// turns the whole delivery into a 500; events that succeeded have already
/// replied.
pub async fn callback(
    State(state): State<AppState>,
    VerifiedBody(body): VerifiedBody,
) -> Result<StatusCode, AppError> {
    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::Internal(format!("invalid webhook payload: {e}")))?;

    let event_count = payload.events.len();
    let summary = state.relay.handle_batch(&payload.events).await?;

    tracing::info!(
        destination = payload.destination.as_deref().unwrap_or("-"),
        event_count,
        replied = summary.replied,
        skipped = summary.skipped,
        "webhook batch handled"
    );

    Ok(StatusCode::OK)
}
