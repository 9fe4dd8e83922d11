//! Signed-claims session tokens shared by the master and worker servers.
//!
//! The master mints a token when it assigns a client to a room; the worker
//! requires the token on the snapshot and WebSocket endpoints. A token is
//! `base64url(claims-json) + "." + base64url(hmac-sha256-tag)` signed with a
//! secret both processes load from the environment.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::hmac;
use serde::{Deserialize, Serialize};

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub client_id: String,
    pub username: String,
    pub room_id: String,
}

/// Reasons a presented token is rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    // Not two dot-separated parts, bad base64, or claims that do not parse.
    Malformed,
    // Structurally valid but the signature does not match the secret.
    BadSignature,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "malformed token"),
            TokenError::BadSignature => write!(f, "invalid token signature"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issues a signed token carrying `claims`.
pub fn mint(claims: &SessionClaims, secret: &[u8]) -> Result<String, TokenError> {
    let payload = serde_json::to_vec(claims).map_err(|_| TokenError::Malformed)?;
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret);
    let tag = hmac::sign(&key, &payload);
    Ok(format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(&payload),
        URL_SAFE_NO_PAD.encode(tag.as_ref())
    ))
}

/// Verifies `token` against `secret` and returns its claims.
pub fn verify(token: &str, secret: &[u8]) -> Result<SessionClaims, TokenError> {
    let (payload_b64, tag_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
    let payload = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| TokenError::Malformed)?;
    let tag = URL_SAFE_NO_PAD
        .decode(tag_b64)
        .map_err(|_| TokenError::Malformed)?;

    // ring's verify is constant-time over the tag comparison.
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret);
    hmac::verify(&key, &payload, &tag).map_err(|_| TokenError::BadSignature)?;

    serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)
}
