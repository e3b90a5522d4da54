//! PostgreSQL implementation of the mapping store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{NewUrlRecord, Origin, UrlRecord};
use crate::domain::repositories::{StoreError, UrlRepository};

/// Row shape of the `url_records` table.
#[derive(Debug, sqlx::FromRow)]
struct UrlRecordRow {
    code: String,
    long_url: String,
    origin: String,
    owner_key_id: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UrlRecordRow> for UrlRecord {
    type Error = StoreError;

    fn try_from(row: UrlRecordRow) -> Result<Self, Self::Error> {
        let origin = row.origin.parse::<Origin>().map_err(StoreError::Backend)?;

        Ok(UrlRecord::new(
            row.code,
            row.long_url,
            origin,
            row.created_at,
            row.owner_key_id,
        ))
    }
}

/// PostgreSQL repository for short code mappings.
///
/// Uniqueness is enforced by the `code` primary key: inserts use
/// `ON CONFLICT (code) DO NOTHING`, so concurrent writers of different codes
/// never block each other and a conflicting insert leaves the row untouched.
/// Statements run in autocommit mode, so a successful insert has been
/// committed before it returns.
///
/// Every statement is bounded by `timeout`; expiry maps to
/// [`StoreError::Unavailable`].
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result.map_err(map_sqlx_error),
            Err(_) => Err(StoreError::Unavailable(format!(
                "statement timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

/// Classifies SQLx errors into retryable and terminal store errors.
pub fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(e.to_string()),
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::CodeTaken {
            code: String::new(),
        },
        other => StoreError::Backend(other.to_string()),
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert_if_absent(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        let row = self
            .bounded(
                sqlx::query_as::<_, UrlRecordRow>(
                    r#"
            INSERT INTO url_records (code, long_url, origin, owner_key_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO NOTHING
            RETURNING code, long_url, origin, owner_key_id, created_at
            "#,
                )
                .bind(&new_record.code)
                .bind(&new_record.long_url)
                .bind(new_record.origin.as_str())
                .bind(&new_record.owner_key_id)
                .fetch_optional(self.pool.as_ref()),
            )
            .await
            .map_err(|e| match e {
                StoreError::CodeTaken { .. } => StoreError::CodeTaken {
                    code: new_record.code.clone(),
                },
                other => other,
            })?;

        match row {
            Some(row) => row.try_into(),
            None => Err(StoreError::CodeTaken {
                code: new_record.code,
            }),
        }
    }

    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = self
            .bounded(
                sqlx::query_as::<_, UrlRecordRow>(
                    r#"
            SELECT code, long_url, origin, owner_key_id, created_at
            FROM url_records
            WHERE code = $1
            "#,
                )
                .bind(code)
                .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        row.map(UrlRecord::try_from).transpose()
    }

    async fn count(&self) -> Result<i64, StoreError> {
        self.bounded(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM url_records")
                .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn health_check(&self) -> bool {
        self.bounded(sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(self.pool.as_ref()))
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_pool_timeout_is_retryable() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_map_io_error_is_retryable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(map_sqlx_error(sqlx::Error::Io(io)).is_retryable());
    }

    #[test]
    fn test_map_row_not_found_is_backend() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn test_row_with_unknown_origin_is_rejected() {
        let row = UrlRecordRow {
            code: "abc".to_string(),
            long_url: "https://example.com".to_string(),
            origin: "imported".to_string(),
            owner_key_id: "ops".to_string(),
            created_at: Utc::now(),
        };

        assert!(matches!(UrlRecord::try_from(row), Err(StoreError::Backend(_))));
    }
}
