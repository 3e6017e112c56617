use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use sea_orm::{
    DatabaseBackend, DatabaseConnection, DatabaseConnectionType, DbErr, MockDatabase, RuntimeErr,
};
use tower::ServiceExt;

use coursemart_auth::infra::mailer::ResendNotifier;
use coursemart_auth::router::build_router;
use coursemart_auth::state::AppState;
use coursemart_core::middleware::X_REQUEST_ID;
use coursemart_session::guard::GuardPaths;
use coursemart_session::token::now_secs;
use coursemart_testing::session::{MockSession, cookie_header_for, test_settings};

fn app() -> Router {
    app_with_db(DatabaseConnectionType::Disconnected.into())
}

fn app_with_db(db: DatabaseConnection) -> Router {
    let notifier = ResendNotifier::new(
        "http://127.0.0.1:9/emails",
        "re_test",
        "noreply@example.com",
        Duration::from_secs(1),
    )
    .unwrap();
    build_router(AppState {
        db,
        notifier,
        session: Arc::new(test_settings()),
        guard_paths: Arc::new(GuardPaths::default()),
    })
}

async fn get(uri: &str, session: Option<&MockSession>) -> Response<Body> {
    let mut req = Request::builder().method("GET").uri(uri);
    if let Some(session) = session {
        let (name, value) = session.cookie_header();
        req = req.header(name, value);
    }
    app().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
}

async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(resp: &Response<Body>) -> &str {
    resp.headers().get(LOCATION).unwrap().to_str().unwrap()
}

fn session_set_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("coursemart_session="))
        .map(str::to_owned)
}

// ── Route guard ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_redirect_anonymous_admin_request_to_login() {
    let resp = get("/admin", None).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/login?callbackUrl=%2Fadmin");
}

#[tokio::test]
async fn should_keep_path_and_query_in_callback() {
    let resp = get("/admin/courses?page=2", None).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        "/admin/login?callbackUrl=%2Fadmin%2Fcourses%3Fpage%3D2"
    );
}

#[tokio::test]
async fn should_redirect_member_to_forbidden() {
    let resp = get("/admin", Some(&MockSession::member())).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/error");
}

#[tokio::test]
async fn should_allow_admin() {
    let resp = get("/admin", Some(&MockSession::admin())).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["identity"]["email"], "admin@example.com");
    assert_eq!(json["identity"]["is_admin"], true);
}

#[tokio::test]
async fn should_send_admin_away_from_login_page() {
    let resp = get("/admin/login", Some(&MockSession::admin())).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin");
}

#[tokio::test]
async fn should_serve_login_page_to_anonymous_and_members() {
    let resp = get("/admin/login?callbackUrl=%2Fadmin", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["action"], "/auth/sign-in");
    assert_eq!(json["callbackUrl"], "/admin");

    let resp = get("/admin/login", Some(&MockSession::member())).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_not_guard_lookalike_prefix() {
    let resp = get("/administrator", None).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_treat_forged_cookie_as_anonymous() {
    let mut token = MockSession::admin().token();
    token.push('x');
    let (name, value) = cookie_header_for(&token);
    let req = Request::builder()
        .uri("/admin")
        .header(name, value)
        .body(Body::empty())
        .unwrap();

    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).starts_with("/admin/login"));
}

#[tokio::test]
async fn should_render_forbidden_page() {
    let resp = get("/auth/error", Some(&MockSession::member())).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let json = body_json(resp).await;
    assert_eq!(json["reason"], "Forbidden");
}

// ── Session endpoints ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_null_session_when_anonymous() {
    let resp = get("/auth/session", None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::Value::Null);
}

#[tokio::test]
async fn should_return_session_user() {
    let resp = get("/auth/session", Some(&MockSession::member())).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_set_cookie(&resp).is_none(), "fresh session is not re-issued");
    let json = body_json(resp).await;
    assert_eq!(json["user"]["id"], "member-1");
    assert_eq!(json["user"]["email"], "member@example.com");
    assert_eq!(json["user"]["is_admin"], false);
    assert!(json["expires"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn should_refresh_stale_session() {
    let settings = test_settings();
    let iat = now_secs() - settings.update_age_secs - 60;
    let token = MockSession::member().token_issued_at(iat, settings.max_age_secs);
    let (name, value) = cookie_header_for(&token);
    let req = Request::builder()
        .uri("/auth/session")
        .header(name, value)
        .body(Body::empty())
        .unwrap();

    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_set_cookie(&resp).expect("stale session should be re-issued");
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.starts_with(&format!("coursemart_session={token}")));
}

#[tokio::test]
async fn should_clear_cookie_on_sign_out() {
    let settings = test_settings();
    let iat = now_secs() - settings.update_age_secs - 60;
    let token = MockSession::member().token_issued_at(iat, settings.max_age_secs);
    let (name, value) = cookie_header_for(&token);
    let req = Request::builder()
        .method("POST")
        .uri("/auth/sign-out")
        .header(name, value)
        .body(Body::empty())
        .unwrap();

    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cookies: Vec<_> = resp.headers().get_all(SET_COOKIE).iter().collect();
    assert_eq!(cookies.len(), 1, "sign-out must not be undone by a refresh");
    let cookie = session_set_cookie(&resp).unwrap();
    assert!(cookie.starts_with("coursemart_session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

// ── Sign-in endpoint ─────────────────────────────────────────────────────────

fn sign_in_request(content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut req = Request::builder().method("POST").uri("/auth/sign-in");
    if let Some(content_type) = content_type {
        req = req.header("content-type", content_type);
    }
    req.body(Body::from(body.to_owned())).unwrap()
}

#[tokio::test]
async fn should_map_store_outage_to_503() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Conn(RuntimeErr::Internal(
            "connection refused (os error 111)".to_owned(),
        ))])
        .into_connection();
    let body = serde_json::json!({ "email": "a@x.com", "password": "secret" }).to_string();

    let resp = app_with_db(db)
        .oneshot(sign_in_request(Some("application/json"), &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(resp).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["reason"], "StoreUnavailable");
    assert_eq!(
        json["message"],
        "service temporarily unavailable, try again later"
    );
    assert!(!json.to_string().contains("os error"));
}

#[tokio::test]
async fn should_reject_malformed_json_with_error_envelope() {
    let resp = app()
        .oneshot(sign_in_request(Some("application/json"), "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["reason"], "InvalidInput");
}

#[tokio::test]
async fn should_reject_numeric_code_with_error_envelope() {
    let body = r#"{"email":"a@x.com","password":"secret","code":123456}"#;

    let resp = app()
        .oneshot(sign_in_request(Some("application/json"), body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["reason"], "InvalidInput");
}

#[tokio::test]
async fn should_reject_missing_content_type_with_error_envelope() {
    let body = serde_json::json!({ "email": "a@x.com", "password": "secret" }).to_string();

    let resp = app().oneshot(sign_in_request(None, &body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["reason"], "InvalidInput");
}

#[tokio::test]
async fn should_reject_missing_credentials_without_store() {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/sign-in")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["reason"], "InvalidCredentials");
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_healthz_with_request_id() {
    let resp = get("/healthz", None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(X_REQUEST_ID).is_some());
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let resp = get("/readyz", None).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
