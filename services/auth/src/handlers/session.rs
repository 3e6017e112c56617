use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use coursemart_core::serde::unix_secs_to_rfc3339_ms;
use coursemart_domain::user::Identity;
use coursemart_session::cookie::clear_session_cookie;
use coursemart_session::extract::Session;

use crate::state::AppState;

// ── GET /auth/session ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: Identity,
    #[serde(serialize_with = "unix_secs_to_rfc3339_ms")]
    pub expires: u64,
}

pub async fn get_session(Session(claims): Session) -> Json<Option<SessionResponse>> {
    Json(claims.map(|c| SessionResponse {
        user: c.identity(),
        expires: c.exp,
    }))
}

// ── POST /auth/sign-out ───────────────────────────────────────────────────────

pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (StatusCode::NO_CONTENT, clear_session_cookie(jar, &state.session))
}
