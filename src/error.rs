//! Application error taxonomy and HTTP mapping.
//!
//! Every failure a caller can observe is one [`AppError`] variant with a stable
//! machine-readable `code`, so clients can render a specific message per kind
//! instead of a generic failure.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to HTTP clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by issuance, resolution and the HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// The submitted long URL is not a usable absolute http(s) URL.
    #[error("Invalid long URL: {reason}")]
    InvalidLongUrl { reason: String },

    /// The API key is missing or not in the permitted set.
    #[error("Unauthorized")]
    Unauthorized,

    /// The custom alias is empty, too long or uses characters outside the alphabet.
    #[error("Invalid alias: {reason}")]
    InvalidFormat { reason: String },

    /// The custom alias collides with a system route.
    #[error("Alias '{alias}' is reserved")]
    Reserved { alias: String },

    /// The custom alias is already mapped to another URL.
    #[error("Alias '{alias}' is already taken")]
    AlreadyTaken { alias: String },

    /// Every generation attempt collided; the keyspace must be widened.
    #[error("Failed to generate a unique code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    /// The mapping store timed out or could not be reached.
    #[error("Store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// No record exists for the requested code.
    #[error("Short URL not found")]
    NotFound,

    /// The request body could not be decoded.
    #[error("Malformed request: {reason}")]
    MalformedRequest { reason: String },

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl AppError {
    pub fn invalid_long_url(reason: impl Into<String>) -> Self {
        Self::InvalidLongUrl {
            reason: reason.into(),
        }
    }

    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRequest {
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable identifier of the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidLongUrl { .. } => "invalid_long_url",
            Self::Unauthorized => "unauthorized",
            Self::InvalidFormat { .. } => "invalid_alias",
            Self::Reserved { .. } => "reserved_alias",
            Self::AlreadyTaken { .. } => "already_taken",
            Self::GenerationExhausted { .. } => "generation_exhausted",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::NotFound => "not_found",
            Self::MalformedRequest { .. } => "malformed_request",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidLongUrl { .. }
            | Self::InvalidFormat { .. }
            | Self::Reserved { .. }
            | Self::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AlreadyTaken { .. } => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::GenerationExhausted { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let details = match self {
            Self::InvalidLongUrl { reason }
            | Self::InvalidFormat { reason }
            | Self::MalformedRequest { reason } => json!({ "reason": reason }),
            Self::Reserved { alias } | Self::AlreadyTaken { alias } => json!({ "alias": alias }),
            Self::GenerationExhausted { attempts } => json!({ "attempts": attempts }),
            Self::StoreUnavailable { .. } => json!({ "retryable": true }),
            // Backend details stay in the logs.
            Self::Unauthorized | Self::NotFound | Self::Internal { .. } => json!({}),
        };

        let message = match self {
            Self::StoreUnavailable { .. } => "Store unavailable, retry later".to_string(),
            Self::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal { reason } => tracing::error!(reason = %reason, "internal error"),
            Self::StoreUnavailable { reason } => {
                tracing::warn!(reason = %reason, "store unavailable")
            }
            Self::GenerationExhausted { attempts } => {
                tracing::error!(attempts, "code generation exhausted, widen the keyspace")
            }
            _ => {}
        }

        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::CodeTaken { code } => Self::AlreadyTaken { alias: code },
            StoreError::Unavailable(reason) => Self::StoreUnavailable { reason },
            StoreError::Backend(reason) => Self::Internal { reason },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors.field_errors();

        if fields.contains_key("long_url") {
            Self::invalid_long_url("URL length must be between 1 and 2048 bytes")
        } else if fields.contains_key("alias") {
            Self::invalid_format("Alias length must be between 1 and 32 characters")
        } else {
            Self::malformed(errors.to_string())
        }
    }
}
