//! API key extraction from HTTP request headers.

use axum::http::HeaderMap;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "API-Key";

/// Extracts the API key from the `API-Key` header.
///
/// A missing or non-UTF-8 header yields an empty key, which the access gate
/// always rejects. Surrounding whitespace is trimmed.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("api-key", "secret".parse().unwrap());
///
/// assert_eq!(extract_api_key(&headers), "secret");
/// ```
pub fn extract_api_key(headers: &HeaderMap) -> &str {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default()
}
