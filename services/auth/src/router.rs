use axum::{
    Router,
    extract::FromRef,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use coursemart_core::health::healthz;
use coursemart_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    admin::{admin_home, admin_login, forbidden},
    health::readyz,
    session::{get_session, sign_out},
    sign_in::sign_in,
};
use crate::middleware::{GuardState, route_guard};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let guard_state = GuardState::from_ref(&state);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Authenticator
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/session", get(get_session))
        .route("/auth/sign-out", post(sign_out))
        .route("/auth/error", get(forbidden))
        // Privileged area
        .route("/admin", get(admin_home))
        .route("/admin/login", get(admin_login))
        .with_state(state)
        .layer(from_fn_with_state(guard_state, route_guard))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
}
