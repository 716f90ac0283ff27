//! Crate-level error type.
//!
//! Layer-specific errors (`WorkflowError`, `PersistenceError`, `ApiError`) convert
//! into [`UpstacError`] so binaries and integration code can use a single `Result`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpstacError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("State transition error: {0}")]
    StateTransitionError(String),
    #[error("Event error: {0}")]
    EventError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for UpstacError {
    fn from(error: serde_json::Error) -> Self {
        UpstacError::ValidationError(format!("JSON serialization error: {error}"))
    }
}

impl From<sqlx::Error> for UpstacError {
    fn from(err: sqlx::Error) -> Self {
        UpstacError::DatabaseError(err.to_string())
    }
}

impl From<config::ConfigError> for UpstacError {
    fn from(err: config::ConfigError) -> Self {
        UpstacError::ConfigurationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UpstacError>;
