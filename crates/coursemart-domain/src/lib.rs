//! Domain types shared across Coursemart crates.
//!
//! Pure types with no framework dependencies.

pub mod id;
pub mod user;
