//! Short URL issuance service.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::application::services::access_gate::{AccessGate, KeyId};
use crate::domain::entities::{NewUrlRecord, Origin, UrlRecord};
use crate::domain::repositories::{StoreError, UrlRepository};
use crate::error::AppError;
use crate::utils::alias_validator::AliasValidator;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_long_url;

/// Tunables for issuance.
#[derive(Debug, Clone)]
pub struct IssuanceSettings {
    /// Public prefix that codes are appended to, e.g. `https://sho.rt/dns_resolver`.
    pub base_url: String,
    /// Generate-and-insert attempts before [`AppError::GenerationExhausted`].
    pub max_generation_attempts: usize,
    /// Retries of a single insert on [`StoreError::Unavailable`].
    pub store_max_retries: usize,
    /// Base delay of the exponential store retry backoff.
    pub store_retry_base_delay: Duration,
}

impl Default for IssuanceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/dns_resolver".to_string(),
            max_generation_attempts: 5,
            store_max_retries: 3,
            store_retry_base_delay: Duration::from_millis(10),
        }
    }
}

/// A successfully issued short URL.
#[derive(Debug, Clone)]
pub struct IssuedUrl {
    pub short_url: String,
    pub record: UrlRecord,
}

/// Service for creating short URLs.
///
/// Orchestrates authorization, long URL validation, alias selection (custom or
/// generated) and the atomic store insert. No deduplication by long URL: every
/// successful call creates an independent record.
pub struct IssuanceService {
    repository: Arc<dyn UrlRepository>,
    access_gate: Arc<AccessGate>,
    generator: CodeGenerator,
    alias_validator: AliasValidator,
    settings: IssuanceSettings,
}

impl IssuanceService {
    /// Creates a new issuance service.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        access_gate: Arc<AccessGate>,
        generator: CodeGenerator,
        alias_validator: AliasValidator,
        settings: IssuanceSettings,
    ) -> Self {
        Self {
            repository,
            access_gate,
            generator,
            alias_validator,
            settings,
        }
    }

    /// Issues a short URL for `long_url`.
    ///
    /// # Flow
    ///
    /// 1. Authorize `api_key` (before anything else, so unauthorized callers
    ///    learn nothing about their input or the keyspace)
    /// 2. Validate `long_url`
    /// 3. With `requested_alias`: validate it and insert once
    /// 4. Without: generate codes until an insert succeeds, up to
    ///    `max_generation_attempts`
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] - key missing or unknown; the store is untouched
    /// - [`AppError::InvalidLongUrl`] - URL rejected by validation
    /// - [`AppError::InvalidFormat`] / [`AppError::Reserved`] - alias rejected
    /// - [`AppError::AlreadyTaken`] - custom alias exists; never retried
    /// - [`AppError::GenerationExhausted`] - every generated code collided
    /// - [`AppError::StoreUnavailable`] - store still failing after retries
    pub async fn issue(
        &self,
        long_url: &str,
        requested_alias: Option<&str>,
        api_key: &str,
    ) -> Result<IssuedUrl, AppError> {
        let result = self.try_issue(long_url, requested_alias, api_key).await;

        match &result {
            Ok(issued) => {
                counter!("shortener_issued_total", "origin" => issued.record.origin.as_str())
                    .increment(1);
                info!(
                    code = %issued.record.code,
                    origin = %issued.record.origin,
                    owner = %issued.record.owner_key_id,
                    "Short URL issued"
                );
            }
            Err(e) => {
                counter!("shortener_issue_failures_total", "reason" => e.code()).increment(1);
                debug!(reason = e.code(), "Issuance rejected: {}", e);
            }
        }

        result
    }

    async fn try_issue(
        &self,
        long_url: &str,
        requested_alias: Option<&str>,
        api_key: &str,
    ) -> Result<IssuedUrl, AppError> {
        let key_id = self.access_gate.authorize(api_key)?;

        validate_long_url(long_url, &self.settings.base_url)
            .map_err(|e| AppError::invalid_long_url(e.to_string()))?;

        let record = match requested_alias {
            Some(alias) => self.insert_custom(long_url, alias, &key_id).await?,
            None => self.insert_generated(long_url, &key_id).await?,
        };

        Ok(IssuedUrl {
            short_url: self.short_url(&record.code),
            record,
        })
    }

    /// Runs only the access gate.
    ///
    /// Used by the HTTP layer so that an undecodable body from an unknown
    /// caller is still reported as `Unauthorized`.
    pub fn authorize(&self, api_key: &str) -> Result<KeyId, AppError> {
        self.access_gate.authorize(api_key)
    }

    /// Builds the externally visible short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), code)
    }

    async fn insert_custom(
        &self,
        long_url: &str,
        alias: &str,
        key_id: &KeyId,
    ) -> Result<UrlRecord, AppError> {
        self.alias_validator.validate(alias)?;

        let new_record = NewUrlRecord {
            code: alias.to_string(),
            long_url: long_url.to_string(),
            origin: Origin::Custom,
            owner_key_id: key_id.to_string(),
        };

        self.insert_with_retry(new_record).await.map_err(|e| match e {
            StoreError::CodeTaken { .. } => AppError::AlreadyTaken {
                alias: alias.to_string(),
            },
            other => other.into(),
        })
    }

    async fn insert_generated(&self, long_url: &str, key_id: &KeyId) -> Result<UrlRecord, AppError> {
        let max_attempts = self.settings.max_generation_attempts;

        for attempt in 1..=max_attempts {
            let code = self.generator.generate();

            if self.alias_validator.is_reserved(&code) {
                debug!(attempt, "Generated code {} is reserved, regenerating", code);
                counter!("shortener_code_collisions_total").increment(1);
                continue;
            }

            let new_record = NewUrlRecord {
                code,
                long_url: long_url.to_string(),
                origin: Origin::Generated,
                owner_key_id: key_id.to_string(),
            };

            match self.insert_with_retry(new_record).await {
                Ok(record) => return Ok(record),
                Err(StoreError::CodeTaken { code }) => {
                    warn!(attempt, max_attempts, "Generated code {} collided", code);
                    counter!("shortener_code_collisions_total").increment(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::GenerationExhausted {
            attempts: max_attempts,
        })
    }

    /// Inserts with bounded exponential backoff on transient store failures.
    ///
    /// Only [`StoreError::Unavailable`] is retried; `CodeTaken` and backend
    /// errors return immediately. A timed-out insert may still have committed,
    /// in which case the retry observes `CodeTaken`.
    async fn insert_with_retry(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        let base_ms = self.settings.store_retry_base_delay.as_millis().max(1) as u64;
        let strategy = ExponentialBackoff::from_millis(base_ms)
            .max_delay(Duration::from_millis(500))
            .map(jitter)
            .take(self.settings.store_max_retries);

        RetryIf::spawn(
            strategy,
            || {
                let repository = self.repository.clone();
                let new_record = new_record.clone();
                async move { repository.insert_if_absent(new_record).await }
            },
            |e: &StoreError| {
                if e.is_retryable() {
                    warn!("Transient store error, retrying insert: {}", e);
                }
                e.is_retryable()
            },
        )
        .await
    }
}
