//! Repository trait for the short code mapping store.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by mapping store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record with this code already exists. The store was not modified.
    #[error("code '{code}' is already taken")]
    CodeTaken { code: String },

    /// The backend timed out or could not be reached. Safe to retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure. Not retryable.
    #[error("store error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Repository interface for the short code keyspace.
///
/// The unique key constraint of the implementation is the only synchronization
/// point for code uniqueness: [`UrlRepository::insert_if_absent`] must be an
/// atomic check-and-set per code, and must not serialize inserts of different
/// codes behind a global lock.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - In-process, non-durable
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a record unless its code is already present.
    ///
    /// Returns only after the record is durably committed (for durable backends).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CodeTaken`] if the code exists.
    /// Returns [`StoreError::Unavailable`] on timeouts and connection failures.
    async fn insert_if_absent(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError>;

    /// Finds a record by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on timeouts and connection failures.
    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Counts stored records.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;
}
