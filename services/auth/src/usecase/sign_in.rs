use chrono::{Duration, Utc};
use rand::RngExt;

use coursemart_domain::id::OneTimeCodeId;
use coursemart_domain::user::normalize_email;

use crate::domain::repository::{Notifier, OneTimeCodeRepository, UserRepository};
use crate::domain::types::{
    ONE_TIME_CODE_LEN, ONE_TIME_CODE_TTL_SECS, OneTimeCode, RejectReason, SignInOutcome,
    UserRecord,
};
use crate::error::AuthServiceError;
use crate::password::verify_password_blocking;

fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}

fn is_well_formed_code(code: &str) -> bool {
    code.len() == ONE_TIME_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

pub struct SignInInput {
    pub email: String,
    pub password: String,
    pub code: Option<String>,
}

pub struct SignInUseCase<U, C, N>
where
    U: UserRepository,
    C: OneTimeCodeRepository,
    N: Notifier,
{
    pub users: U,
    pub codes: C,
    pub notifier: N,
}

impl<U, C, N> SignInUseCase<U, C, N>
where
    U: UserRepository,
    C: OneTimeCodeRepository,
    N: Notifier,
{
    pub async fn execute(&self, input: SignInInput) -> Result<SignInOutcome, AuthServiceError> {
        let email = normalize_email(&input.email);
        if email.is_empty() || input.password.is_empty() {
            return Ok(SignInOutcome::Rejected(RejectReason::InvalidCredentials));
        }

        // 1. Credential check. Unknown e-mail and wrong password take the same path.
        let user = self.users.find_by_email(&email).await?;
        let stored = user.as_ref().and_then(|u| u.hashed_password.clone());
        let matches = verify_password_blocking(input.password, stored).await?;
        let user = match user {
            Some(user) if matches => user,
            _ => {
                tracing::debug!("sign-in rejected: invalid credentials");
                return Ok(SignInOutcome::Rejected(RejectReason::InvalidCredentials));
            }
        };

        // 2. No second factor.
        if !user.mfa_enabled {
            tracing::info!(user_id = %user.id, "signed in");
            return Ok(SignInOutcome::Authenticated(user.identity()));
        }

        // 3./4. Second factor: issue a code, or check the one supplied.
        match input.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            None => self.issue_challenge(&user).await,
            Some(code) => self.verify_code(&user, code).await,
        }
    }

    async fn issue_challenge(&self, user: &UserRecord) -> Result<SignInOutcome, AuthServiceError> {
        let now = Utc::now();
        let code = OneTimeCode {
            id: OneTimeCodeId::generate(),
            user_id: user.id.clone(),
            code: generate_code(),
            expires_at: now + Duration::seconds(ONE_TIME_CODE_TTL_SECS),
            consumed: false,
            created_at: now,
        };

        let invalidated = self.codes.replace_unconsumed(&code).await?;

        if let Err(e) = self.notifier.send_one_time_code(&user.email, &code.code).await {
            tracing::warn!(user_id = %user.id, error = %format!("{e:#}"), "failed to send one-time code");
            return Err(AuthServiceError::NotificationFailed(e));
        }

        tracing::info!(user_id = %user.id, invalidated, "one-time code issued");
        Ok(SignInOutcome::Challenge)
    }

    /// Checks `supplied` against the user's most recently created unconsumed code only.
    /// Issuing a challenge consumes every older row, so at most one row can match; a value
    /// from a superseded challenge is `InvalidCode` even if it was never used.
    async fn verify_code(
        &self,
        user: &UserRecord,
        supplied: &str,
    ) -> Result<SignInOutcome, AuthServiceError> {
        if !is_well_formed_code(supplied) {
            tracing::debug!(user_id = %user.id, "sign-in rejected: malformed code");
            return Ok(SignInOutcome::Rejected(RejectReason::InvalidCode));
        }

        let latest = self.codes.find_latest_unconsumed(&user.id).await?;
        let Some(code) = latest.filter(|c| c.code == supplied) else {
            tracing::debug!(user_id = %user.id, "sign-in rejected: code mismatch");
            return Ok(SignInOutcome::Rejected(RejectReason::InvalidCode));
        };

        // Consume before checking expiry so an expired value cannot be replayed.
        let won = self.codes.mark_consumed(code.id).await?;
        if code.is_expired(Utc::now()) {
            tracing::debug!(user_id = %user.id, "sign-in rejected: code expired");
            return Ok(SignInOutcome::Rejected(RejectReason::ExpiredCode));
        }
        if !won {
            tracing::debug!(user_id = %user.id, "sign-in rejected: code already consumed");
            return Ok(SignInOutcome::Rejected(RejectReason::InvalidCode));
        }

        tracing::info!(user_id = %user.id, "signed in with one-time code");
        Ok(SignInOutcome::Authenticated(user.identity()))
    }
}
