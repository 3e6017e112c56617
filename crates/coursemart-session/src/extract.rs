//! Request extractor for the (optional) session.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::extract::cookie::CookieJar;
use http::request::Parts;

use crate::cookie::SESSION_COOKIE;
use crate::settings::SessionSettings;
use crate::token::SessionClaims;

/// The caller's session, if the cookie is present and verifies.
///
/// Never rejects: a missing, malformed, expired or forged cookie all yield `Session(None)`.
#[derive(Debug, Clone)]
pub struct Session(pub Option<SessionClaims>);

impl Session {
    /// Read the session straight from request headers.
    pub fn from_headers(headers: &http::HeaderMap, settings: &SessionSettings) -> Self {
        let jar = CookieJar::from_headers(headers);
        Self(
            jar.get(SESSION_COOKIE)
                .and_then(|cookie| settings.decode(cookie.value())),
        )
    }
}

impl<S> FromRequestParts<S> for Session
where
    Arc<SessionSettings>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    // Decode synchronously and hand back a 'static future; see axum-core 0.5's
    // `fn -> impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let settings = Arc::<SessionSettings>::from_ref(state);
        let session = Self::from_headers(&parts.headers, &settings);
        async move { Ok(session) }
    }
}
