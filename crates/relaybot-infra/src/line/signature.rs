//! LINE webhook signature verification.
//!
//! LINE signs each webhook with `base64(HMAC-SHA256(channel_secret, raw_body))`
//! and sends it in the `x-line-signature` header. Verification must run on
//! the exact bytes received, before any JSON parsing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Errors from signature verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing {SIGNATURE_HEADER} header")]
    Missing,

    #[error("signature is not valid base64")]
    Malformed,

    #[error("signature mismatch")]
    Mismatch,

    #[error("invalid channel secret")]
    InvalidSecret,
}

/// Verify `signature_b64` against `body` using constant-time comparison.
pub fn verify_line_signature(
    channel_secret: &[u8],
    body: &[u8],
    signature_b64: &str,
) -> Result<(), SignatureError> {
    let signature = signature_b64.trim();
    if signature.is_empty() {
        return Err(SignatureError::Missing);
    }

    let expected = STANDARD
        .decode(signature)
        .map_err(|_| SignatureError::Malformed)?;

    let mut mac =
        HmacSha256::new_from_slice(channel_secret).map_err(|_| SignatureError::InvalidSecret)?;
    mac.update(body);

    // `verify_slice` compares in constant time.
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Compute the signature LINE would send for `body` (for tests and tooling).
pub fn compute_line_signature(channel_secret: &[u8], body: &[u8]) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(channel_secret).map_err(|_| SignatureError::InvalidSecret)?;
    mac.update(body);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
