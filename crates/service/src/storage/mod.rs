//! Storage abstractions for service layer
//!
//! Reusable file-backed stores that persist whole documents as JSON.

pub mod json_list_store;
