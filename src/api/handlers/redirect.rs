//! Handlers resolving short codes.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::dto::resolve::{RedirectUrlQuery, RedirectUrlResponse};
use crate::application::services::Resolution;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its long URL.
///
/// # Endpoint
///
/// `GET /dns_resolver/{code}`
///
/// # Response Codes
///
/// - **307 Temporary Redirect**: `Location` is the stored long URL, verbatim
/// - **404 Not Found**: unknown or malformed code
/// - **503 Service Unavailable**: the store could not be reached
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    match state.resolution_service.resolve(&code).await? {
        Resolution::Found(long_url) => {
            let location = HeaderValue::from_str(&long_url).map_err(|e| {
                AppError::internal(format!("stored URL for '{}' is not a header value: {}", code, e))
            })?;
            Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
        }
        Resolution::NotFound => {
            debug!("No mapping for {}", code);
            Err(AppError::NotFound)
        }
    }
}

/// Resolves a short code and returns the long URL as JSON.
///
/// # Endpoint
///
/// `GET /redirect_url?short_url=<code>`
///
/// A full short URL is accepted too; its last path segment is used as the code.
///
/// # Response
///
/// ```json
/// { "status": "success", "redirect_to": "https://example.com" }
/// ```
///
/// Unknown codes yield 404 with
/// `{ "status": "error", "message": "Short URL not found" }`.
pub async fn redirect_url_handler(
    State(state): State<AppState>,
    query: Result<Query<RedirectUrlQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<RedirectUrlResponse>), AppError> {
    let Query(query) = query.map_err(|e| AppError::malformed(e.body_text()))?;

    let code = query
        .short_url
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    match state.resolution_service.resolve(code).await? {
        Resolution::Found(long_url) => {
            Ok((StatusCode::OK, Json(RedirectUrlResponse::found(long_url))))
        }
        Resolution::NotFound => Ok((StatusCode::NOT_FOUND, Json(RedirectUrlResponse::missing()))),
    }
}
