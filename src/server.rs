//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, migrations, cache setup, service wiring and the
//! Axum server lifecycle.

use crate::application::services::{
    AccessGate, IssuanceService, IssuanceSettings, ResolutionService,
};
use crate::config::{Config, StoreBackend};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{MemoryUrlRepository, PgUrlRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::alias_validator::AliasValidator;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Connects the PostgreSQL pool using the configured pool limits.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the connection fails.
pub async fn connect_pool(config: &Config) -> Result<sqlx::PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required with the postgres store backend")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Builds the configured mapping store.
///
/// PostgreSQL pools are migrated before use. The memory backend only logs a
/// warning: its contents do not survive a restart.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn UrlRepository>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let pool = connect_pool(config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            Ok(Arc::new(PgUrlRepository::new(
                Arc::new(pool),
                Duration::from_millis(config.store_timeout_ms),
            )))
        }
        StoreBackend::Memory => {
            tracing::warn!(
                "Using the in-memory store: mappings are lost on restart, do not use in production"
            );
            Ok(Arc::new(MemoryUrlRepository::new()))
        }
    }
}

async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Wires services into an [`AppState`] around an existing store and cache.
///
/// # Errors
///
/// Returns an error if the code alphabet or length is invalid.
pub fn build_state(
    config: &Config,
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
) -> Result<AppState> {
    let generator = CodeGenerator::new(&config.code_alphabet, config.code_length)
        .context("Invalid code generator configuration")?;

    tracing::info!(
        alphabet = generator.alphabet_size(),
        length = generator.length(),
        "Code keyspace: collisions become likely after ~{:.3e} codes",
        generator.birthday_bound()
    );

    let access_gate = Arc::new(AccessGate::new(&config.api_keys));
    let alias_validator = AliasValidator::new(config.alias_max_length, &config.reserved_aliases);

    let settings = IssuanceSettings {
        base_url: config.base_url.clone(),
        max_generation_attempts: config.generation_max_attempts,
        store_max_retries: config.store_max_retries,
        ..IssuanceSettings::default()
    };

    let issuance_service = Arc::new(IssuanceService::new(
        repository.clone(),
        access_gate,
        generator,
        alias_validator,
        settings,
    ));
    let resolution_service = Arc::new(ResolutionService::new(repository.clone(), cache.clone()));

    Ok(AppState::new(
        issuance_service,
        resolution_service,
        repository,
        cache,
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Mapping store (PostgreSQL with migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - Issuance and resolution services
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;
    let cache = build_cache(&config).await;
    let state = build_state(&config, repository, cache)?;

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
