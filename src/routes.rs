//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /generate_url`            - Create with generated code (API key, rate limited)
//! - `POST /generate_custom_url`     - Create with custom alias (API key, rate limited)
//! - `GET  /dns_resolver/{code}`     - Redirect (public)
//! - `GET  /redirect_url?short_url=` - JSON resolution (public)
//! - `GET  /ping`                    - Liveness (public)
//! - `GET  /health`                  - Store and cache checks (public)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on creation routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, ping_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes and state without the outer layers.
///
/// The rate limiter needs `ConnectInfo<SocketAddr>` on every creation request.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes::creation_routes().layer(rate_limit::creation_layer()))
        .merge(api::routes::resolution_routes())
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state))
}
