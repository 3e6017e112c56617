use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use coursemart_session::cookie::set_session_cookie;
use coursemart_session::settings::SessionSettings;

use crate::domain::types::SignInOutcome;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::sign_in::{SignInInput, SignInUseCase};

// ── POST /auth/sign-in ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub code: Option<String>,
}

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Response, AuthServiceError> {
    let Json(body) = payload.map_err(|e| {
        tracing::debug!(error = %e, "sign-in request rejected");
        AuthServiceError::InvalidInput("expected a JSON body with email and password")
    })?;

    let usecase = SignInUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        notifier: state.notifier.clone(),
    };

    let outcome = usecase
        .execute(SignInInput {
            email: body.email,
            password: body.password,
            code: body.code,
        })
        .await?;

    render_outcome(outcome, jar, &state.session)
}

/// Map a sign-in outcome to its HTTP response, setting the session cookie on success.
pub fn render_outcome(
    outcome: SignInOutcome,
    jar: CookieJar,
    settings: &SessionSettings,
) -> Result<Response, AuthServiceError> {
    let resp = match outcome {
        SignInOutcome::Authenticated(identity) => {
            let token = settings
                .issue(&identity)
                .map_err(|e| AuthServiceError::Internal(anyhow::Error::new(e)))?;
            let jar = set_session_cookie(jar, token, settings);
            (
                StatusCode::OK,
                jar,
                Json(json!({ "ok": true, "identity": identity })),
            )
                .into_response()
        }
        SignInOutcome::Challenge => (
            StatusCode::ACCEPTED,
            Json(json!({ "ok": false, "reason": "MfaRequired" })),
        )
            .into_response(),
        SignInOutcome::Rejected(reason) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "ok": false,
                "reason": reason.as_str(),
                "message": reason.message(),
            })),
        )
            .into_response(),
    };
    Ok(resp)
}
