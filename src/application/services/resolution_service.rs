//! Short code resolution on the redirect hot path.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::is_well_formed_code;

/// Outcome of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    NotFound,
}

/// Service resolving short codes to their long URLs.
///
/// Pure read: no writes to the store. Codes that could never have been issued
/// resolve to [`Resolution::NotFound`] without a store round trip, and are not
/// distinguished from absent codes.
///
/// Lookups go through a read-through cache. Records are immutable, so cached
/// entries never need invalidation.
pub struct ResolutionService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
}

impl ResolutionService {
    /// Creates a new resolution service.
    pub fn new(repository: Arc<dyn UrlRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Resolves a short code.
    ///
    /// # Cache Strategy
    ///
    /// - **Cache hit**: return immediately
    /// - **Cache miss**: query the store, then populate the cache in the background
    ///   unless caching is disabled
    /// - **Cache error**: log and fall back to the store
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store cannot be reached.
    /// An absent code is not an error.
    pub async fn resolve(&self, code: &str) -> Result<Resolution, AppError> {
        if !is_well_formed_code(code) {
            counter!("shortener_resolutions_total", "outcome" => "not_found").increment(1);
            return Ok(Resolution::NotFound);
        }

        match self.cache.get_url(code).await {
            Ok(Some(long_url)) => {
                counter!("shortener_resolutions_total", "outcome" => "cache_hit").increment(1);
                return Ok(Resolution::Found(long_url));
            }
            Ok(None) => debug!("Cache MISS for {}", code),
            Err(e) => warn!("Cache error for {}: {}", code, e),
        }

        let Some(record) = self.repository.get(code).await? else {
            counter!("shortener_resolutions_total", "outcome" => "not_found").increment(1);
            return Ok(Resolution::NotFound);
        };

        if self.cache.is_enabled() {
            let cache = self.cache.clone();
            let cache_code = record.code.clone();
            let cache_url = record.long_url.clone();
            tokio::spawn(async move {
                if let Err(e) = cache.set_url(&cache_code, &cache_url, None).await {
                    warn!("Failed to cache {}: {}", cache_code, e);
                }
            });
        }

        counter!("shortener_resolutions_total", "outcome" => "found").increment(1);
        Ok(Resolution::Found(record.long_url))
    }
}
