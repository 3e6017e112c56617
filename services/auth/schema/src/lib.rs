//! sea-orm entities for the credential and one-time-code tables.

pub mod users;
pub mod verification_tokens;
