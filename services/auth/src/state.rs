use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use coursemart_session::guard::GuardPaths;
use coursemart_session::settings::SessionSettings;

use crate::infra::db::{DbOneTimeCodeRepository, DbUserRepository};
use crate::infra::mailer::ResendNotifier;
use crate::middleware::GuardState;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: ResendNotifier,
    pub session: Arc<SessionSettings>,
    pub guard_paths: Arc<GuardPaths>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_repo(&self) -> DbOneTimeCodeRepository {
        DbOneTimeCodeRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for Arc<SessionSettings> {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}

impl FromRef<AppState> for GuardState {
    fn from_ref(state: &AppState) -> Self {
        GuardState {
            session: state.session.clone(),
            paths: state.guard_paths.clone(),
        }
    }
}
