//! Access token claims
//!
//! The client never verifies signatures; it only reads the expiry claim out of
//! the token's payload segment to decide whether a stored session is still live.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// Claims errors
#[derive(Debug, thiserror::Error)]
pub enum ClaimsError {
    #[error("Token has no payload segment")]
    Malformed,

    #[error("Payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Payload is not a claims object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Subset of the claims the client cares about
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (Unix timestamp, seconds; may carry a fraction)
    pub exp: f64,
    /// Subject (user ID)
    #[serde(default)]
    pub sub: Option<String>,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<f64>,
}

impl TokenClaims {
    /// A token expiring exactly at `now` is already expired
    pub fn is_live_at(&self, now: i64) -> bool {
        self.exp > now as f64
    }

    pub fn is_live(&self) -> bool {
        self.is_live_at(now_secs())
    }
}

/// Decode the middle segment of `header.payload.signature`
pub fn decode_claims(token: &str) -> Result<TokenClaims, ClaimsError> {
    let payload = token.split('.').nth(1).ok_or(ClaimsError::Malformed)?;
    if payload.is_empty() {
        return Err(ClaimsError::Malformed);
    }

    // Some issuers pad the segment; the no-pad engine rejects '='
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Current wall-clock time in seconds since the epoch
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
