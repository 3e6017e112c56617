//! Argon2id password hashing.
//!
//! Hashing and verification are CPU-bound; the async wrappers move them onto the blocking pool.

use std::sync::LazyLock;

use anyhow::Context as _;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Verified against when there is no real hash to check, so unknown accounts cost the same.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("coursemart-dummy-password").ok());

/// Hash `plain` into a PHC string with a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?
        .to_string();
    Ok(hash)
}

/// `true` only if `stored` is present, parses, and matches `plain`.
///
/// A missing or unparsable `stored` still runs one Argon2 verification.
pub fn verify_password(plain: &str, stored: Option<&str>) -> bool {
    let parsed = stored.and_then(|s| PasswordHash::new(s).ok());
    match parsed {
        Some(hash) => Argon2::default()
            .verify_password(plain.as_bytes(), &hash)
            .is_ok(),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref().and_then(|s| PasswordHash::new(s).ok()) {
                let _ = Argon2::default().verify_password(plain.as_bytes(), &dummy);
            }
            false
        }
    }
}

pub async fn hash_password_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("password hashing task")?
}

pub async fn verify_password_blocking(plain: String, stored: Option<String>) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, stored.as_deref()))
        .await
        .context("password verification task")
}
