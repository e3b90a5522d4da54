//! DTOs for JSON resolution endpoint.

use serde::{Deserialize, Serialize};

/// Query of `GET /redirect_url`.
#[derive(Debug, Deserialize)]
pub struct RedirectUrlQuery {
    /// The short code (not the full short URL).
    pub short_url: String,
}

/// Resolution outcome in the legacy `status` envelope.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RedirectUrlResponse {
    Found {
        status: &'static str,
        redirect_to: String,
    },
    Missing {
        status: &'static str,
        message: &'static str,
    },
}

impl RedirectUrlResponse {
    pub fn found(redirect_to: String) -> Self {
        Self::Found {
            status: "success",
            redirect_to,
        }
    }

    pub fn missing() -> Self {
        Self::Missing {
            status: "error",
            message: "Short URL not found",
        }
    }
}
