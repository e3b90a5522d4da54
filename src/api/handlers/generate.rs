//! Handlers for short URL creation endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use metrics::counter;
use validator::Validate;

use crate::api::dto::generate::{
    GenerateCustomUrlRequest, GenerateUrlRequest, GenerateUrlResponse,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::extract_api_key::extract_api_key;

/// Creates a short URL with a generated code.
///
/// # Endpoint
///
/// `POST /generate_url`
///
/// # Headers
///
/// - `Content-Type: application/json`
/// - `API-Key: <key>`
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://example.com/a/b?c=1" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "success",
///   "short_url": "http://localhost:8000/dns_resolver/aZ3-x_9Q",
///   "code": "aZ3-x_9Q"
/// }
/// ```
///
/// # Errors
///
/// - 401 `unauthorized` - checked before the body is looked at
/// - 400 `malformed_request` / `invalid_long_url`
/// - 500 `generation_exhausted`
/// - 503 `store_unavailable`
pub async fn generate_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<GenerateUrlRequest>, JsonRejection>,
) -> Result<Json<GenerateUrlResponse>, AppError> {
    let api_key = extract_api_key(&headers);
    let payload = accept_body(&state, api_key, payload)?;

    let issued = state
        .issuance_service
        .issue(&payload.long_url, None, api_key)
        .await?;

    Ok(Json(GenerateUrlResponse::success(
        issued.short_url,
        issued.record.code,
    )))
}

/// Creates a short URL under a caller-chosen alias.
///
/// # Endpoint
///
/// `POST /generate_custom_url`
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://example.com", "alias": "spring-promo" }
/// ```
///
/// # Errors
///
/// Same as [`generate_url_handler`], plus:
///
/// - 400 `invalid_alias` / `reserved_alias`
/// - 409 `already_taken` - the existing mapping is left untouched
pub async fn generate_custom_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<GenerateCustomUrlRequest>, JsonRejection>,
) -> Result<Json<GenerateUrlResponse>, AppError> {
    let api_key = extract_api_key(&headers);
    let payload = accept_body(&state, api_key, payload)?;

    let issued = state
        .issuance_service
        .issue(&payload.long_url, Some(&payload.alias), api_key)
        .await?;

    Ok(Json(GenerateUrlResponse::success(
        issued.short_url,
        issued.record.code,
    )))
}

/// Authorizes the caller, then decodes and validates the body.
///
/// The gate runs first so that unknown callers always get `unauthorized`,
/// whatever they sent.
fn accept_body<T: Validate>(
    state: &AppState,
    api_key: &str,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let result = state.issuance_service.authorize(api_key).and_then(|_| {
        let Json(body) = payload.map_err(|e| AppError::malformed(e.body_text()))?;
        body.validate()?;
        Ok(body)
    });

    if let Err(ref e) = result {
        counter!("shortener_issue_failures_total", "reason" => e.code()).increment(1);
    }

    result
}
