//! Svix webhook signature verification.
//!
//! Clerk delivers webhooks through Svix: three headers (`svix-id`,
//! `svix-timestamp`, `svix-signature`) plus an HMAC-SHA256 signature over
//! `{id}.{timestamp}.{raw body}`. The signing secret from the dashboard is
//! `whsec_` followed by the base64-encoded key, and the signature header
//! carries a space-separated list of `v1,<base64 sig>` candidates (the list
//! grows during secret rotation).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::SyncError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed skew between the delivery timestamp and now, in seconds.
/// Replays outside this window are rejected even with a valid signature.
const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Verify a webhook delivery's signature headers against the raw body.
///
/// # Errors
///
/// Returns `SyncError::Authentication` on a malformed secret or timestamp,
/// a timestamp outside the tolerance window, or a signature mismatch.
pub fn verify(
    secret: &str,
    id: &str,
    timestamp: &str,
    signature_header: &str,
    payload: &[u8],
) -> Result<(), SyncError> {
    verify_at(chrono::Utc::now().timestamp(), secret, id, timestamp, signature_header, payload)
}

fn verify_at(
    now: i64,
    secret: &str,
    id: &str,
    timestamp: &str,
    signature_header: &str,
    payload: &[u8],
) -> Result<(), SyncError> {
    let ts: i64 = timestamp
        .parse()
        .map_err(|_| SyncError::Authentication("invalid svix-timestamp".into()))?;
    if (now - ts).abs() > TIMESTAMP_TOLERANCE_SECS {
        return Err(SyncError::Authentication(
            "webhook timestamp outside tolerance".into(),
        ));
    }

    let key = BASE64
        .decode(secret.strip_prefix("whsec_").unwrap_or(secret))
        .map_err(|_| SyncError::Authentication("malformed webhook secret".into()))?;

    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|_| SyncError::Authentication("malformed webhook secret".into()))?;
    mac.update(id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = BASE64.encode(mac.finalize().into_bytes());

    // Header format: "v1,<sig> v1,<sig> ..." — any v1 candidate may match.
    let matched = signature_header
        .split_whitespace()
        .filter_map(|candidate| candidate.strip_prefix("v1,"))
        .any(|sig| sig == expected);

    if matched {
        Ok(())
    } else {
        Err(SyncError::Authentication("signature mismatch".into()))
    }
}
