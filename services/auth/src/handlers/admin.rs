use axum::{Json, extract::Query};
use serde::Deserialize;
use serde_json::{Value, json};

use coursemart_core::error::AppError;
use coursemart_session::extract::Session;

// ── GET /admin ────────────────────────────────────────────────────────────────

/// The guard already redirects non-admins; the check here keeps the handler safe on its own.
pub async fn admin_home(Session(claims): Session) -> Result<Json<Value>, AppError> {
    let claims = claims.ok_or(AppError::Unauthorized)?;
    if !claims.is_admin {
        return Err(AppError::Forbidden);
    }
    Ok(Json(json!({ "ok": true, "identity": claims.identity() })))
}

// ── GET /admin/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

pub async fn admin_login(Query(query): Query<LoginQuery>) -> Json<Value> {
    Json(json!({
        "action": "/auth/sign-in",
        "callbackUrl": query.callback_url.filter(|c| c.starts_with('/')),
    }))
}

// ── GET /auth/error ───────────────────────────────────────────────────────────

pub async fn forbidden() -> AppError {
    AppError::Forbidden
}
