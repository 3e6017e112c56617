use axum::{extract::State, http::StatusCode};

use coursemart_core::health::readiness;

use crate::state::AppState;

pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.db.ping().await)
}
