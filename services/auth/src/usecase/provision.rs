//! Operator-side account management used by the `provision` binary.

use chrono::Utc;

use coursemart_domain::id::UserId;
use coursemart_domain::user::{is_plausible_email, normalize_email};

use crate::domain::repository::UserRepository;
use crate::domain::types::UserRecord;
use crate::error::AuthServiceError;
use crate::password::hash_password_blocking;

fn validated_email(raw: &str) -> Result<String, AuthServiceError> {
    let email = normalize_email(raw);
    if !is_plausible_email(&email) {
        return Err(AuthServiceError::InvalidInput("email must look like name@domain"));
    }
    Ok(email)
}

fn validated_password(raw: &str) -> Result<&str, AuthServiceError> {
    if raw.is_empty() {
        return Err(AuthServiceError::InvalidInput("password must not be empty"));
    }
    Ok(raw)
}

async fn find_user<U: UserRepository>(
    users: &U,
    raw_email: &str,
) -> Result<UserRecord, AuthServiceError> {
    let email = validated_email(raw_email)?;
    users
        .find_by_email(&email)
        .await?
        .ok_or(AuthServiceError::UserNotFound)
}

// ── create ────────────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub is_admin: bool,
    pub mfa_enabled: bool,
}

pub struct CreateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CreateUserUseCase<U> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<UserRecord, AuthServiceError> {
        let email = validated_email(&input.email)?;
        let password = validated_password(&input.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::EmailTaken);
        }

        let hash = hash_password_blocking(password.to_owned()).await?;
        let now = Utc::now();
        let user = UserRecord {
            id: UserId::generate(),
            email,
            hashed_password: Some(hash),
            name: input.name.filter(|n| !n.trim().is_empty()),
            is_admin: input.is_admin,
            mfa_enabled: input.mfa_enabled,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, is_admin = user.is_admin, "user created");
        Ok(user)
    }
}

// ── set-admin / set-mfa ───────────────────────────────────────────────────────

pub struct UpdateUserFlagsInput {
    pub email: String,
    pub is_admin: Option<bool>,
    pub mfa_enabled: Option<bool>,
}

pub struct UpdateUserFlagsUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateUserFlagsUseCase<U> {
    pub async fn execute(&self, input: UpdateUserFlagsInput) -> Result<UserRecord, AuthServiceError> {
        let user = find_user(&self.users, &input.email).await?;
        if !self
            .users
            .set_flags(&user.id, input.is_admin, input.mfa_enabled)
            .await?
        {
            return Err(AuthServiceError::UserNotFound);
        }
        tracing::info!(
            user_id = %user.id,
            is_admin = ?input.is_admin,
            mfa_enabled = ?input.mfa_enabled,
            "user flags updated"
        );
        self.users
            .find_by_id(&user.id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)
    }
}

// ── set-password ──────────────────────────────────────────────────────────────

pub struct SetPasswordInput {
    pub email: String,
    pub password: String,
}

pub struct SetPasswordUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SetPasswordUseCase<U> {
    pub async fn execute(&self, input: SetPasswordInput) -> Result<(), AuthServiceError> {
        let password = validated_password(&input.password)?;
        let user = find_user(&self.users, &input.email).await?;
        let hash = hash_password_blocking(password.to_owned()).await?;
        if !self.users.set_password_hash(&user.id, &hash).await? {
            return Err(AuthServiceError::UserNotFound);
        }
        tracing::info!(user_id = %user.id, "password rotated");
        Ok(())
    }
}

// ── show ──────────────────────────────────────────────────────────────────────

pub struct ShowUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ShowUserUseCase<U> {
    pub async fn execute(&self, email: &str) -> Result<UserRecord, AuthServiceError> {
        find_user(&self.users, email).await
    }
}
