//! API route configuration.

use crate::api::handlers::{
    generate_custom_url_handler, generate_url_handler, redirect_handler, redirect_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes that create mappings. Every request must carry an `API-Key` header.
///
/// # Endpoints
///
/// - `POST /generate_url`        - Shorten with a generated code
/// - `POST /generate_custom_url` - Shorten under a caller-chosen alias
pub fn creation_routes() -> Router<AppState> {
    Router::new()
        .route("/generate_url", post(generate_url_handler))
        .route("/generate_custom_url", post(generate_custom_url_handler))
}

/// Public, read-only routes.
///
/// # Endpoints
///
/// - `GET /dns_resolver/{code}`          - 307 redirect to the long URL
/// - `GET /redirect_url?short_url=<code>` - Long URL as JSON
pub fn resolution_routes() -> Router<AppState> {
    Router::new()
        .route("/dns_resolver/{code}", get(redirect_handler))
        .route("/redirect_url", get(redirect_url_handler))
}
