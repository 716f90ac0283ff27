//! # Web API Error Types
//!
//! Error type returned by the request handlers, with the HTTP status each
//! variant maps to and the JSON error body a transport layer would send.

use crate::logging::log_error;
use crate::state_machine::WorkflowError;
use serde_json::{json, Value};
use thiserror::Error;

/// Handler errors with HTTP status code mappings.
///
/// Messages are carried through from the workflow unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("{message}")]
    Internal { message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::BadRequest { .. } => 400,
            Self::Unauthorized => 401,
            Self::Internal { .. } => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// JSON error body: `{"error": {"code": ..., "message": ...}}`.
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string()
            }
        })
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::NotFound { .. } => Self::NotFound { message },
            WorkflowError::InvalidState { .. } | WorkflowError::DuplicateRequest => {
                Self::Conflict { message }
            }
            WorkflowError::Validation(_) => Self::BadRequest { message },
            WorkflowError::Persistence(_) => {
                log_error("web", "workflow", &message, None);
                Self::Internal { message }
            }
        }
    }
}
