use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use coursemart_core::error::error_body;

/// Auth service error variants. Credential and code rejections are not errors;
/// see [`crate::domain::types::SignInOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("could not send verification code, try again later")]
    NotificationFailed(#[source] anyhow::Error),
    #[error("service temporarily unavailable, try again later")]
    StoreUnavailable(#[source] anyhow::Error),
    #[error("user not found")]
    UserNotFound,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotificationFailed(_) => "NotificationFailed",
            Self::StoreUnavailable(_) => "StoreUnavailable",
            Self::UserNotFound => "UserNotFound",
            Self::EmailTaken => "EmailTaken",
            Self::InvalidInput(_) => "InvalidInput",
            Self::Internal(_) => "Internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotificationFailed(_) | Self::StoreUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        // TraceLayer already records every status; only the store/internal chains need logging.
        // Notifier failures are logged at warn where they happen.
        match &self {
            Self::StoreUnavailable(e) | Self::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), reason = self.reason(), "auth error");
            }
            _ => {}
        }
        let body = error_body(self.reason(), &self.to_string());
        (self.status(), axum::Json(body)).into_response()
    }
}
