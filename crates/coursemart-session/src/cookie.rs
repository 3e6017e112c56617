//! Session cookie builders.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::settings::SessionSettings;

/// Cookie name for the session token.
pub const SESSION_COOKIE: &str = "coursemart_session";

fn base_cookie(value: String, settings: &SessionSettings, max_age: Duration) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .secure(settings.cookie_secure)
        .same_site(SameSite::Lax);
    if let Some(domain) = &settings.cookie_domain {
        builder = builder.domain(domain.clone());
    }
    builder.build()
}

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use coursemart_session::cookie::{set_session_cookie, SESSION_COOKIE};
/// use coursemart_session::settings::SessionSettings;
///
/// let mut settings = SessionSettings::new("secret");
/// settings.cookie_domain = Some("example.com".to_string());
/// let jar = set_session_cookie(CookieJar::new(), "token".to_string(), &settings);
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(2_592_000)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, settings: &SessionSettings) -> CookieJar {
    let max_age = Duration::seconds(i64::try_from(settings.max_age_secs).unwrap_or(i64::MAX));
    jar.add(base_cookie(value, settings, max_age))
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use coursemart_session::cookie::{clear_session_cookie, set_session_cookie, SESSION_COOKIE};
/// use coursemart_session::settings::SessionSettings;
///
/// let settings = SessionSettings::new("secret");
/// let jar = set_session_cookie(CookieJar::new(), "token".to_string(), &settings);
/// let jar = clear_session_cookie(jar, &settings);
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// assert_eq!(cookie.domain(), None);
/// ```
pub fn clear_session_cookie(jar: CookieJar, settings: &SessionSettings) -> CookieJar {
    jar.add(base_cookie(String::new(), settings, Duration::ZERO))
}
