//! Signed session cookies for driving guarded routes in tests.

use http::{HeaderName, HeaderValue, header::COOKIE};

use coursemart_domain::id::UserId;
use coursemart_domain::user::Identity;
use coursemart_session::cookie::SESSION_COOKIE;
use coursemart_session::settings::SessionSettings;
use coursemart_session::token::{SessionClaims, encode_session};

/// Secret shared by test routers and [`MockSession`].
pub const TEST_SESSION_SECRET: &str = "test-session-secret-for-unit-tests-only";

/// Session settings suitable for tests (`Secure` off, no domain).
pub fn test_settings() -> SessionSettings {
    let mut settings = SessionSettings::new(TEST_SESSION_SECRET);
    settings.cookie_secure = false;
    settings
}

/// Identity that a test request should appear to carry.
pub struct MockSession {
    pub identity: Identity,
}

impl MockSession {
    pub fn admin() -> Self {
        Self::new("admin-1", "admin@example.com", true)
    }

    pub fn member() -> Self {
        Self::new("member-1", "member@example.com", false)
    }

    pub fn new(id: &str, email: &str, is_admin: bool) -> Self {
        Self {
            identity: Identity {
                id: UserId::from(id),
                email: email.to_owned(),
                name: None,
                is_admin,
            },
        }
    }

    /// A fresh token signed with [`TEST_SESSION_SECRET`].
    pub fn token(&self) -> String {
        test_settings()
            .issue(&self.identity)
            .unwrap_or_else(|e| panic!("failed to sign test session: {e}"))
    }

    /// A token issued at `iat`, for expiry and refresh tests.
    pub fn token_issued_at(&self, iat: u64, max_age_secs: u64) -> String {
        let claims = SessionClaims::new(&self.identity, iat, max_age_secs);
        encode_session(&claims, TEST_SESSION_SECRET)
            .unwrap_or_else(|e| panic!("failed to sign test session: {e}"))
    }

    /// `Cookie` request header carrying [`MockSession::token`].
    pub fn cookie_header(&self) -> (HeaderName, HeaderValue) {
        cookie_header_for(&self.token())
    }
}

/// `Cookie` request header carrying an arbitrary session token.
pub fn cookie_header_for(token: &str) -> (HeaderName, HeaderValue) {
    let value = HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}"))
        .unwrap_or_else(|e| panic!("invalid cookie header: {e}"));
    (COOKIE, value)
}
