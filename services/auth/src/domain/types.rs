use chrono::{DateTime, Utc};

use coursemart_domain::id::{OneTimeCodeId, UserId};
use coursemart_domain::user::Identity;

/// Provisioned account as stored, including credential material.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    /// Argon2 PHC string; `None` when no password was ever set.
    pub hashed_password: Option<String>,
    pub name: Option<String>,
    pub is_admin: bool,
    pub mfa_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// The subset of the record that is safe to put in a session.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Six-digit code e-mailed during the second sign-in step.
#[derive(Debug, Clone)]
pub struct OneTimeCode {
    pub id: OneTimeCodeId,
    pub user_id: UserId,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
    pub created_at: DateTime<Utc>,
}

impl OneTimeCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Result of a sign-in attempt that did not fail for infrastructure reasons.
#[derive(Debug, Clone, PartialEq)]
pub enum SignInOutcome {
    Authenticated(Identity),
    /// Password accepted, a code was e-mailed; resubmit with the code.
    Challenge,
    Rejected(RejectReason),
}

/// Why a sign-in was rejected. Unknown e-mail and wrong password share
/// `InvalidCredentials` so callers cannot enumerate accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidCredentials,
    InvalidCode,
    ExpiredCode,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "InvalidCredentials",
            Self::InvalidCode => "InvalidCode",
            Self::ExpiredCode => "ExpiredCode",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid email or password",
            Self::InvalidCode => "invalid verification code",
            Self::ExpiredCode => "verification code expired",
        }
    }
}

/// One-time code length in digits.
pub const ONE_TIME_CODE_LEN: usize = 6;

/// One-time code time-to-live in seconds.
pub const ONE_TIME_CODE_TTL_SECS: i64 = 600;
