//! Signed webhook body extractor.
//!
//! Reads the raw body and checks the `x-line-signature` header against the
//! channel secret before the handler sees any bytes. JSON parsing happens
//! afterwards, on the verified bytes.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};

use relaybot_infra::line::signature::{SIGNATURE_HEADER, SignatureError, verify_line_signature};

use crate::http::error::AppError;
use crate::state::AppState;

/// Raw request body whose LINE signature has been verified.
pub struct VerifiedBody(pub Bytes);

impl FromRequest<AppState> for VerifiedBody {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let signature = signature_header(req.headers())?;

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        check_signature(state.channel_secret.as_deref(), &body, signature.as_deref())?;
        Ok(Self(body))
    }
}

fn signature_header(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    headers
        .get(SIGNATURE_HEADER)
        .map(|value| {
            value
                .to_str()
                .map(str::to_owned)
                .map_err(|_| AppError::Unauthorized("invalid signature header encoding".into()))
        })
        .transpose()
}

/// Verify `body` against the optional secret and header value.
fn check_signature(
    secret: Option<&SecretString>,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), AppError> {
    let secret = secret.ok_or_else(|| {
        AppError::Unauthorized("LINE_CHANNEL_SECRET is not set; cannot verify webhook".into())
    })?;
    let signature = signature.ok_or_else(|| AppError::Unauthorized(SignatureError::Missing.to_string()))?;

    verify_line_signature(secret.expose_secret().as_bytes(), body, signature)
        .map_err(|e| AppError::Unauthorized(e.to_string()))
}
