//! Signed bearer tokens issued on login.
//!
//! A token is `base64url(subject:expiry) . base64url(hmac_sha256(payload))`.
//! The subject is the username; the expiry is a unix timestamp computed
//! from the configured TTL at mint time.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Claims carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Username the token was issued for.
    pub subject: String,
    /// Unix timestamp after which the token is rejected.
    pub expires_at: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Issue a token for `subject` expiring `ttl_secs` from now.
pub fn mint(subject: &str, secret: &[u8], ttl_secs: u64) -> String {
    mint_with_expiry(subject, secret, Utc::now().timestamp() + ttl_secs as i64)
}

fn mint_with_expiry(subject: &str, secret: &[u8], expires_at: i64) -> String {
    let payload = format!("{subject}:{expires_at}");
    let signature = sign(payload.as_bytes(), secret);
    format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(payload.as_bytes()),
        URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Check signature and expiry, returning the claims on success.
pub fn verify(token: &str, secret: &[u8]) -> Result<TokenClaims, TokenError> {
    let (payload_part, signature_part) = token.split_once('.').ok_or(TokenError::Malformed)?;
    let payload = URL_SAFE_NO_PAD
        .decode(payload_part)
        .map_err(|_| TokenError::Malformed)?;
    let signature = URL_SAFE_NO_PAD
        .decode(signature_part)
        .map_err(|_| TokenError::Malformed)?;

    let mut mac = new_mac(secret);
    mac.update(&payload);
    // verify_slice is constant-time
    mac.verify_slice(&signature)
        .map_err(|_| TokenError::BadSignature)?;

    let payload = String::from_utf8(payload).map_err(|_| TokenError::Malformed)?;
    // Usernames may contain ':'; the expiry is always the last segment.
    let (subject, expires_at) = payload.rsplit_once(':').ok_or(TokenError::Malformed)?;
    let expires_at: i64 = expires_at.parse().map_err(|_| TokenError::Malformed)?;

    if expires_at < Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }

    Ok(TokenClaims {
        subject: subject.to_string(),
        expires_at,
    })
}

fn sign(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = new_mac(secret);
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

fn new_mac(secret: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size")
}
