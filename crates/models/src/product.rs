use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ModelError;

pub const MISSING_FIELDS: &str = "Missing required fields: link and category";
pub const INVALID_URL: &str = "Invalid URL format";

/// Catalog entry pairing an affiliate link with a category label.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub link: String,
    pub category: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Submission payload; `id` and `createdAt` are assigned server-side.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewProduct {
    pub link: Option<String>,
    pub category: Option<String>,
}

impl NewProduct {
    pub fn new(link: impl Into<String>, category: impl Into<String>) -> Self {
        Self { link: Some(link.into()), category: Some(category.into()) }
    }

    /// Presence check then URL check. Returns the trimmed `(link, category)`.
    pub fn validate(&self) -> Result<(String, String), ModelError> {
        let link = self.link.as_deref().map(str::trim).unwrap_or_default();
        let category = self.category.as_deref().map(str::trim).unwrap_or_default();
        if link.is_empty() || category.is_empty() {
            return Err(ModelError::Validation(MISSING_FIELDS.into()));
        }
        validate_link(link)?;
        Ok((link.to_string(), category.to_string()))
    }
}

/// Accept only links that parse as absolute URLs.
pub fn validate_link(link: &str) -> Result<Url, ModelError> {
    Url::parse(link).map_err(|_| ModelError::Validation(INVALID_URL.into()))
}

impl Product {
    /// Build a product stamped with `now`, picking an id not already in `existing`.
    pub fn create(link: String, category: String, now: DateTime<Utc>, existing: &[Product]) -> Self {
        Self {
            id: next_id(now, existing),
            link,
            category,
            created_at: now,
        }
    }
}

/// Ids are the creation time in epoch milliseconds, bumped past any collision.
pub fn next_id(now: DateTime<Utc>, existing: &[Product]) -> String {
    let taken: HashSet<&str> = existing.iter().map(|p| p.id.as_str()).collect();
    let mut candidate = now.timestamp_millis();
    while taken.contains(candidate.to_string().as_str()) {
        candidate += 1;
    }
    candidate.to_string()
}
