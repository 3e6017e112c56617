use std::time::Duration;

use serde::Deserialize;

use coursemart_core::config::Config;
use coursemart_session::settings::{DEFAULT_MAX_AGE_SECS, DEFAULT_UPDATE_AGE_SECS, SessionSettings};

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing session tokens. Env var: `SESSION_SECRET`.
    pub session_secret: String,
    /// API key for the e-mail provider. Env var: `RESEND_API_KEY`.
    pub resend_api_key: String,
    /// E-mail provider send endpoint. Env var: `RESEND_API_URL`.
    #[serde(default = "default_resend_api_url")]
    pub resend_api_url: String,
    /// Sender used for verification e-mails. Env var: `MAIL_FROM`.
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    /// Cookie domain attribute; host-only cookie when unset. Env var: `COOKIE_DOMAIN`.
    #[serde(default)]
    pub cookie_domain: Option<String>,
    /// Env var: `COOKIE_SECURE` (default true).
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
    /// Env var: `SESSION_MAX_AGE_SECS` (default 30 days).
    #[serde(default = "default_session_max_age")]
    pub session_max_age_secs: u64,
    /// Env var: `SESSION_UPDATE_AGE_SECS` (default 24 hours).
    #[serde(default = "default_session_update_age")]
    pub session_update_age_secs: u64,
    /// TCP port to listen on. Env var: `AUTH_PORT` (default 3000).
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    /// Timeout for outbound calls (database connect/acquire, e-mail API).
    /// Env var: `HTTP_TIMEOUT_SECS` (default 5).
    #[serde(default = "default_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Config for AuthConfig {}

impl AuthConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            secret: self.session_secret.clone(),
            cookie_domain: self.cookie_domain.clone().filter(|d| !d.is_empty()),
            cookie_secure: self.cookie_secure,
            max_age_secs: self.session_max_age_secs,
            update_age_secs: self.session_update_age_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Configuration for the `provision` CLI, which only touches the database.
#[derive(Debug, Deserialize)]
pub struct ProvisionConfig {
    pub database_url: String,
    #[serde(default = "default_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Config for ProvisionConfig {}

impl ProvisionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn default_resend_api_url() -> String {
    "https://api.resend.com/emails".to_owned()
}

fn default_mail_from() -> String {
    "Course Platform <noreply@courseplatform.com>".to_owned()
}

fn default_true() -> bool {
    true
}

fn default_session_max_age() -> u64 {
    DEFAULT_MAX_AGE_SECS
}

fn default_session_update_age() -> u64 {
    DEFAULT_UPDATE_AGE_SECS
}

fn default_auth_port() -> u16 {
    3000
}

fn default_timeout_secs() -> u64 {
    5
}
