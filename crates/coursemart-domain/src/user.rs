//! User identity types.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Authenticated identity handed from the authenticator to the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub is_admin: bool,
}

/// Canonical form of an e-mail address used for storage and lookup.
///
/// Surrounding whitespace is dropped and the address is lower-cased, so
/// `" A@X.com "` and `"a@x.com"` address the same account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Cheap shape check applied before provisioning. Not an RFC 5322 validator.
pub fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
