//! Signed session token (HS256 JWT) carrying the caller's identity.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use coursemart_domain::id::UserId;
use coursemart_domain::user::Identity;

/// Errors returned by [`encode_session`] and [`decode_session`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("session expired")]
    Expired,
    #[error("malformed session token")]
    Malformed,
    #[error("failed to sign session token")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

/// Claims embedded in the session cookie.
///
/// | Field | Meaning |
/// |-------|---------|
/// | `sub` | user id |
/// | `email` | normalised e-mail |
/// | `name` | display name, if any |
/// | `is_admin` | admin flag at sign-in time |
/// | `iat` / `exp` | issue and expiry, seconds since epoch |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
    pub is_admin: bool,
    pub iat: u64,
    pub exp: u64,
}

impl SessionClaims {
    pub fn new(identity: &Identity, now: u64, max_age_secs: u64) -> Self {
        Self {
            sub: identity.id.to_string(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            is_admin: identity.is_admin,
            iat: now,
            exp: now + max_age_secs,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: UserId::from(self.sub.as_str()),
            email: self.email.clone(),
            name: self.name.clone(),
            is_admin: self.is_admin,
        }
    }

    /// Whether the token is old enough to be re-issued with a fresh expiry.
    pub fn needs_refresh(&self, now: u64, update_age_secs: u64) -> bool {
        now.saturating_sub(self.iat) >= update_age_secs
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Sign `claims` with `secret`.
pub fn encode_session(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(SessionError::Sign)
}

/// Verify signature and expiry, returning the embedded claims.
///
/// HS256 only; `exp` and `sub` are required. Default leeway (60s) applies to `exp`.
pub fn decode_session(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?;

    Ok(data.claims)
}
