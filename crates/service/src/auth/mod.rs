//! Admin authentication: a single privileged actor identified by a configured
//! username and an argon2 password hash, holding HS256 session tokens.

pub mod domain;
pub mod errors;
pub mod service;

pub use service::{AdminAuthConfig, AdminAuthService};
