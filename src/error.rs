//! Error types
//!
//! `ConvertError` is the engine's own taxonomy. `ApiError` wraps it for the
//! configuration, logging and CLI layers.

use thiserror::Error;

/// Errors raised by the conversion engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Input does not have the shape or fields the conversion requires
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Requested shape pair is not supported by the engine
    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

/// Errors surfaced by the tooling layer.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Json(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}
