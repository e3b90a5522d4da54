//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{IssuanceService, ResolutionService};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::CacheService;

/// Application state shared across handlers.
///
/// Cheap to clone: every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub issuance_service: Arc<IssuanceService>,
    pub resolution_service: Arc<ResolutionService>,
    pub repository: Arc<dyn UrlRepository>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    pub fn new(
        issuance_service: Arc<IssuanceService>,
        resolution_service: Arc<ResolutionService>,
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            issuance_service,
            resolution_service,
            repository,
            cache,
        }
    }
}
