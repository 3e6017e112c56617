//! Service plumbing shared by Coursemart binaries.
//!
//! Configuration loading, the generic [`error::AppError`], health handlers,
//! request-id and tracing setup.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
