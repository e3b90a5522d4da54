//! URL record entity representing a short code to long URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How the short code of a record was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Assigned by the code generator.
    Generated,
    /// Chosen by the caller as a custom alias.
    Custom,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generated" => Ok(Self::Generated),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown record origin '{}'", other)),
        }
    }
}

/// A persisted mapping from short code to long URL.
///
/// Records are append-only: once stored, `code` and `long_url` never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRecord {
    pub code: String,
    pub long_url: String,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
    pub owner_key_id: String,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        code: String,
        long_url: String,
        origin: Origin,
        created_at: DateTime<Utc>,
        owner_key_id: String,
    ) -> Self {
        Self {
            code,
            long_url,
            origin,
            created_at,
            owner_key_id,
        }
    }
}

/// Input data for inserting a new record.
///
/// `created_at` is assigned by the store at insertion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub code: String,
    pub long_url: String,
    pub origin: Origin,
    pub owner_key_id: String,
}

impl NewUrlRecord {
    /// Materializes the record with the given creation time.
    pub fn into_record(self, created_at: DateTime<Utc>) -> UrlRecord {
        UrlRecord::new(
            self.code,
            self.long_url,
            self.origin,
            created_at,
            self.owner_key_id,
        )
    }
}
