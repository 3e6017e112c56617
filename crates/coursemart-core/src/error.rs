use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Generic error for handlers outside the sign-in flow (admin area, landing pages).
///
/// Rendered with the same envelope as the authenticator:
/// `{"ok": false, "reason": "...", "message": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("sign in required")]
    Unauthorized,
    #[error("access denied")]
    Forbidden,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::Internal(_) => "Internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Build the shared `{ok: false, reason, message}` error body.
pub fn error_body(reason: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "ok": false,
        "reason": reason,
        "message": message,
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 4xx are expected client outcomes and already visible in the TraceLayer span.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, reason = "Internal", "internal error");
        }
        let body = error_body(self.reason(), &self.to_string());
        (self.status(), axum::Json(body)).into_response()
    }
}
