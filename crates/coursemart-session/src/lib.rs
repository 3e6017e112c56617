//! Stateless session propagation for Coursemart.
//!
//! An authenticated [`Identity`](coursemart_domain::user::Identity) is carried in a
//! signed cookie. This crate issues and verifies that token, builds the cookie,
//! extracts the session from requests and decides whether a path may be served.

pub mod cookie;
pub mod extract;
pub mod guard;
pub mod settings;
pub mod token;
