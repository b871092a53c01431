//! API error façade: error kinds and the JSON error envelope.
//!
//! Every handled error maps to exactly one HTTP status and the same
//! four-field body.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// JSON body returned for every handled error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Short, human readable summary.
    pub error: String,
    /// Detail about this occurrence.
    pub description: String,
    /// Stable error kind identifier.
    pub error_type: String,
    /// Same value as the HTTP status.
    pub status_code: u16,
}

/// Error kinds handled by the façade.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Malformed request.
    #[error("{0}")]
    BadRequest(String),

    /// Credential token past its expiry.
    #[error("Token has expired")]
    TokenExpired,

    /// Missing or rejected credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Application-level misuse of an endpoint.
    #[error("{message}: {description}")]
    InvalidUsage { message: String, description: String },

    /// Application-level credential check failed.
    #[error("{message}: {description}")]
    InvalidCredentials { message: String, description: String },

    /// Application-level payload validation failed.
    #[error("{message}: {description}")]
    Validation { message: String, description: String },

    /// Application-level lookup found nothing.
    #[error("{message}: {description}")]
    NotFound { message: String, description: String },

    /// Unexpected server failure.
    #[error("{0}")]
    InternalServerError(String),

    /// Application-level server failure.
    #[error("{message}: {description}")]
    Internal { message: String, description: String },

    /// No route matched the request.
    #[error("route not found")]
    RouteNotFound,
}

/// Description used for unmatched routes.
pub const ROUTE_NOT_FOUND: &str = "The requested URL was not found on the server. \
If you entered the URL manually please check your spelling and try again.";

/// Description used for panics caught in handlers.
pub const INTERNAL_FAILURE: &str = "The server encountered an internal error and was unable \
to complete your request.";

impl ApiError {
    pub fn invalid_usage(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self::InvalidUsage {
            message: message.into(),
            description: description.into(),
        }
    }

    pub fn invalid_credentials(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            message: message.into(),
            description: description.into(),
        }
    }

    pub fn validation(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            description: description.into(),
        }
    }

    pub fn not_found(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            description: description.into(),
        }
    }

    pub fn internal(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            description: description.into(),
        }
    }

    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidUsage { .. } | Self::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::TokenExpired | Self::Unauthorized(_) | Self::InvalidCredentials { .. } => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound { .. } | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Envelope body for this error.
    pub fn envelope(&self) -> ErrorEnvelope {
        let (error, description, error_type) = match self {
            Self::BadRequest(detail) => ("Bad Request", detail.as_str(), "BadRequest"),
            Self::TokenExpired => ("Token Expired", "Token has expired", "TokenExpired"),
            Self::Unauthorized(detail) => {
                ("Unauthorized access detected", detail.as_str(), "Unauthorized")
            }
            Self::InvalidUsage {
                message,
                description,
            } => (message.as_str(), description.as_str(), "InvalidUsage"),
            Self::InvalidCredentials {
                message,
                description,
            } => (message.as_str(), description.as_str(), "InvalidCredentials"),
            Self::Validation {
                message,
                description,
            } => (message.as_str(), description.as_str(), "ValidationError"),
            Self::NotFound {
                message,
                description,
            } => (message.as_str(), description.as_str(), "NotFound"),
            Self::InternalServerError(detail) => {
                ("Internal Server Error", detail.as_str(), "InternalServerError")
            }
            Self::Internal {
                message,
                description,
            } => (message.as_str(), description.as_str(), "InternalServerError"),
            Self::RouteNotFound => ("Not Found", ROUTE_NOT_FOUND, "NotFound"),
        };

        ErrorEnvelope {
            error: error.to_string(),
            description: description.to_string(),
            error_type: error_type.to_string(),
            status_code: self.status().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(self.envelope())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
