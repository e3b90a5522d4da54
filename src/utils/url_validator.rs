//! Long URL validation.
//!
//! The submitted URL is stored verbatim, so validation only decides whether it
//! is acceptable; it never rewrites it.

use url::Url;

/// Maximum accepted length of a long URL in bytes.
pub const MAX_LONG_URL_LENGTH: usize = 2048;

/// Reasons a long URL is rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_LONG_URL_LENGTH} bytes")]
    TooLong,

    #[error("URL must not contain whitespace or control characters")]
    IllegalCharacters,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL points back into this shortener")]
    SelfReferential,
}

/// Validates a long URL before it is shortened.
///
/// # Rules
///
/// 1. Non-empty and at most [`MAX_LONG_URL_LENGTH`] bytes
/// 2. No whitespace or control characters (the value is stored verbatim)
/// 3. Parses as an absolute URL with an `http` or `https` scheme
/// 4. Has a host
/// 5. Does not start with `short_url_prefix`, which would create redirect loops
///
/// # Security
///
/// Rejects dangerous schemes like `javascript:`, `data:` and `file:`.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] rule that fails.
pub fn validate_long_url(long_url: &str, short_url_prefix: &str) -> Result<(), UrlValidationError> {
    if long_url.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if long_url.len() > MAX_LONG_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if long_url
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(UrlValidationError::IllegalCharacters);
    }

    let parsed =
        Url::parse(long_url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    if is_self_referential(&parsed, short_url_prefix) {
        return Err(UrlValidationError::SelfReferential);
    }

    Ok(())
}

/// Returns true if `url` resolves under the service's own short URL prefix.
fn is_self_referential(url: &Url, short_url_prefix: &str) -> bool {
    let Ok(prefix) = Url::parse(short_url_prefix) else {
        return false;
    };

    let same_origin = url.scheme() == prefix.scheme()
        && url.host_str().map(str::to_ascii_lowercase)
            == prefix.host_str().map(str::to_ascii_lowercase)
        && url.port_or_known_default() == prefix.port_or_known_default();

    let prefix_path = format!("{}/", prefix.path().trim_end_matches('/'));

    same_origin && url.path().starts_with(&prefix_path)
}
