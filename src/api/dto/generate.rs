//! DTOs for short URL creation endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL with a generated code.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateUrlRequest {
    #[validate(length(min = 1, max = 2048))]
    pub long_url: String,
}

/// Request to shorten a URL under a caller-chosen alias.
///
/// Only length is checked here; the alias validator owns the character and
/// reserved-word rules.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateCustomUrlRequest {
    #[validate(length(min = 1, max = 2048))]
    pub long_url: String,

    #[validate(length(min = 1, max = 32))]
    pub alias: String,
}

/// Successful creation response.
///
/// ```json
/// {
///   "status": "success",
///   "short_url": "http://localhost:8000/dns_resolver/aZ3-x_9Q",
///   "code": "aZ3-x_9Q"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct GenerateUrlResponse {
    pub status: &'static str,
    pub short_url: String,
    pub code: String,
}

impl GenerateUrlResponse {
    pub fn success(short_url: String, code: String) -> Self {
        Self {
            status: "success",
            short_url,
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::url_validator::MAX_LONG_URL_LENGTH;

    #[test]
    fn test_long_url_length_bounds() {
        let empty = GenerateUrlRequest {
            long_url: String::new(),
        };
        assert!(empty.validate().is_err());

        let huge = GenerateUrlRequest {
            long_url: format!("https://example.com/{}", "a".repeat(MAX_LONG_URL_LENGTH)),
        };
        assert!(huge.validate().is_err());

        let ok = GenerateUrlRequest {
            long_url: "https://example.com".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_alias_length_bounds() {
        let request = GenerateCustomUrlRequest {
            long_url: "https://example.com".to_string(),
            alias: "a".repeat(33),
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("alias"));
    }
}
