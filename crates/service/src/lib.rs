//! Service layer for the affiliate catalog.
//! - `catalog`: product persistence boundary and the validation/business rules over it.
//! - `auth`: single-admin authentication (argon2 credentials, signed session tokens).
//! - `storage`: reusable JSON file helpers.

pub mod errors;
pub mod auth;
pub mod catalog;
pub mod runtime;
pub mod storage;
