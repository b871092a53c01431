// src/error.rs

//! Unified error handling for the dev tooling (setup, publisher, consumer).
//!
//! HTTP-facing errors live in [`crate::api::error`]; the two tiers are never
//! merged.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for tooling operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// S3 admin call failed
    #[error("S3 error: {0}")]
    S3(String),

    /// Lambda admin call failed
    #[error("Lambda error: {0}")]
    Lambda(String),

    /// AMQP connection, channel or publish failed
    #[error("AMQP error: {0}")]
    Amqp(#[from] lapin::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Function code archive could not be read
    #[error("Cannot read function archive {path}: {source}")]
    Archive {
        path: String,
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A dependency never became ready
    #[error("{service} is not ready after {attempts} attempts")]
    NotReady { service: String, attempts: u32 },
}

impl AppError {
    /// Create an S3 error from any SDK error.
    pub fn s3(message: impl fmt::Display) -> Self {
        Self::S3(message.to_string())
    }

    /// Create a Lambda error from any SDK error.
    pub fn lambda(message: impl fmt::Display) -> Self {
        Self::Lambda(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an archive read error.
    pub fn archive(path: &Path, source: std::io::Error) -> Self {
        Self::Archive {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a readiness timeout error.
    pub fn not_ready(service: impl Into<String>, attempts: u32) -> Self {
        Self::NotReady {
            service: service.into(),
            attempts,
        }
    }

    /// Whether this error comes from exhausting a readiness check.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_message_names_service_and_attempts() {
        let err = AppError::not_ready("RabbitMQ", 10);
        assert!(err.is_not_ready());
        assert_eq!(err.to_string(), "RabbitMQ is not ready after 10 attempts");
    }

    #[test]
    fn archive_error_includes_path() {
        let err = AppError::archive(
            Path::new("lambda/missing.zip"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("lambda/missing.zip"));
        assert!(!err.is_not_ready());
    }
}
