use coursemart_domain::user::Identity;

use crate::token::{SessionClaims, SessionError, decode_session, encode_session, now_secs};

/// 30 days.
pub const DEFAULT_MAX_AGE_SECS: u64 = 2_592_000;

/// 24 hours.
pub const DEFAULT_UPDATE_AGE_SECS: u64 = 86_400;

/// Everything needed to issue, read and set the session cookie.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// HMAC key for the session token.
    pub secret: String,
    /// Cookie `Domain` attribute; host-only cookie when `None`.
    pub cookie_domain: Option<String>,
    /// Cookie `Secure` attribute.
    pub cookie_secure: bool,
    /// Token lifetime and cookie Max-Age.
    pub max_age_secs: u64,
    /// Sessions older than this are re-issued on the next request.
    pub update_age_secs: u64,
}

impl SessionSettings {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            cookie_domain: None,
            cookie_secure: true,
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            update_age_secs: DEFAULT_UPDATE_AGE_SECS,
        }
    }

    /// Sign a fresh session for `identity`, valid from now.
    pub fn issue(&self, identity: &Identity) -> Result<String, SessionError> {
        let claims = SessionClaims::new(identity, now_secs(), self.max_age_secs);
        encode_session(&claims, &self.secret)
    }

    /// Decode a cookie value. Every failure means "no session".
    pub fn decode(&self, token: &str) -> Option<SessionClaims> {
        match decode_session(token, &self.secret) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unusable session token");
                None
            }
        }
    }

    pub fn needs_refresh(&self, claims: &SessionClaims) -> bool {
        claims.needs_refresh(now_secs(), self.update_age_secs)
    }
}
