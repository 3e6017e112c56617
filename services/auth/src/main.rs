use std::sync::Arc;

use anyhow::Context as _;
use tracing::info;

use coursemart_auth::config::AuthConfig;
use coursemart_auth::infra::db::connect;
use coursemart_auth::infra::mailer::ResendNotifier;
use coursemart_auth::router::build_router;
use coursemart_auth::state::AppState;
use coursemart_core::config::Config;
use coursemart_core::tracing::init_tracing;
use coursemart_session::guard::GuardPaths;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = connect(&config.database_url, config.timeout())
        .await
        .context("failed to connect to database")?;

    let notifier = ResendNotifier::new(
        &config.resend_api_url,
        &config.resend_api_key,
        &config.mail_from,
        config.timeout(),
    )?;

    let state = AppState {
        db,
        notifier,
        session: Arc::new(config.session_settings()),
        guard_paths: Arc::new(GuardPaths::default()),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("auth service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
