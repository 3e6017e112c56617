//! Route guard and sliding-session refresh.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use coursemart_session::cookie::{SESSION_COOKIE, set_session_cookie};
use coursemart_session::guard::{GuardPaths, guard};
use coursemart_session::settings::SessionSettings;
use coursemart_session::token::SessionClaims;

#[derive(Clone)]
pub struct GuardState {
    pub session: Arc<SessionSettings>,
    pub paths: Arc<GuardPaths>,
}

/// Gate privileged paths, then re-issue the session cookie if it is due for refresh.
pub async fn route_guard(
    State(state): State<GuardState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Response {
    let claims = jar
        .get(SESSION_COOKIE)
        .and_then(|c| state.session.decode(c.value()));

    let decision = guard(
        &state.paths,
        req.uri().path(),
        req.uri().query(),
        claims.as_ref(),
    );
    if let Some(location) = state.paths.location(&decision) {
        tracing::debug!(path = req.uri().path(), ?decision, "guard redirect");
        return Redirect::to(&location).into_response();
    }

    let response = next.run(req).await;

    match claims {
        Some(claims) if state.session.needs_refresh(&claims) && !sets_session_cookie(&response) => {
            refresh(&state.session, &claims, response)
        }
        _ => response,
    }
}

fn sets_session_cookie(response: &Response) -> bool {
    let prefix = format!("{SESSION_COOKIE}=");
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|v| v.to_str().is_ok_and(|s| s.starts_with(&prefix)))
}

fn refresh(settings: &SessionSettings, claims: &SessionClaims, response: Response) -> Response {
    match settings.issue(&claims.identity()) {
        Ok(token) => {
            tracing::debug!(user_id = %claims.sub, "session refreshed");
            let jar = set_session_cookie(CookieJar::new(), token, settings);
            (jar, response).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to refresh session");
            response
        }
    }
}
