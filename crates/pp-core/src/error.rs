//! # AppError
//!
//! Centralized error handling for Price-Post.
//! Expected failures (bad input, bad credentials) are reported through these
//! variants; anything else is `Internal` and must not leak detail to users.

use thiserror::Error;

/// The primary error type for all pp-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation failure (e.g., empty book list, short password)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Missing or rejected credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials were presented but are not valid
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Infrastructure failure (e.g., storage unavailable)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// A specialized Result type for Price-Post logic.
pub type Result<T> = std::result::Result<T, AppError>;
