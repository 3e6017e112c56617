#![allow(async_fn_in_trait)]

use coursemart_domain::id::{OneTimeCodeId, UserId};

use crate::domain::types::{OneTimeCode, UserRecord};
use crate::error::AuthServiceError;

/// Repository for provisioned accounts.
pub trait UserRepository: Send + Sync {
    /// Look up by normalised e-mail.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthServiceError>;
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, AuthServiceError>;

    /// Fails with `EmailTaken` when the e-mail already exists.
    async fn create(&self, user: &UserRecord) -> Result<(), AuthServiceError>;

    /// Update whichever flags are `Some`. Returns `false` if no such user.
    async fn set_flags(
        &self,
        id: &UserId,
        is_admin: Option<bool>,
        mfa_enabled: Option<bool>,
    ) -> Result<bool, AuthServiceError>;

    /// Returns `false` if no such user.
    async fn set_password_hash(&self, id: &UserId, hash: &str) -> Result<bool, AuthServiceError>;
}

/// Repository for e-mailed one-time codes.
pub trait OneTimeCodeRepository: Send + Sync {
    /// Mark every unconsumed code of `code.user_id` consumed and insert `code`,
    /// atomically. Returns how many older codes were invalidated.
    async fn replace_unconsumed(&self, code: &OneTimeCode) -> Result<u64, AuthServiceError>;

    /// Most recently issued unconsumed code for the user, expired or not.
    async fn find_latest_unconsumed(
        &self,
        user_id: &UserId,
    ) -> Result<Option<OneTimeCode>, AuthServiceError>;

    /// Flip `consumed` only if it is still false. Returns `true` if this call did it.
    async fn mark_consumed(&self, id: OneTimeCodeId) -> Result<bool, AuthServiceError>;
}

/// Outbound delivery of one-time codes.
pub trait Notifier: Send + Sync {
    async fn send_one_time_code(&self, to: &str, code: &str) -> anyhow::Result<()>;
}
