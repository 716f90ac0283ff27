use super::events::WorkflowOperation;
use super::states::RequestStatus;
use crate::error::UpstacError;
use crate::validation::ValidationErrors;
use thiserror::Error;

/// Errors raised at the workflow boundary.
///
/// A failed operation never leaves a partially applied transition behind.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Invalid ID: test request {request_id} not found")]
    NotFound { request_id: i64 },

    #[error(
        "Invalid state for {operation} on test request {request_id}: \
         status is {current}, expected {expected}"
    )]
    InvalidState {
        request_id: i64,
        operation: WorkflowOperation,
        current: RequestStatus,
        expected: RequestStatus,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("A request with the same phone number or email is already in progress")]
    DuplicateRequest,

    #[error("Persistence operation failed: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Errors raised by a [`TestRequestStore`](super::persistence::TestRequestStore).
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The persisted status no longer matches the status the caller read.
    #[error(
        "Concurrent modification detected for test request {request_id}: \
         expected {expected}, found {actual}"
    )]
    ConcurrentModification {
        request_id: i64,
        expected: RequestStatus,
        actual: RequestStatus,
    },

    #[error("Test request {request_id} disappeared during save")]
    Missing { request_id: i64 },

    #[error("Invalid persisted data in {field}: {reason}")]
    InvalidData { field: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl WorkflowError {
    /// Stable kind name for logging and adapters.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidState { .. } => "invalid_state",
            Self::Validation(_) => "validation",
            Self::DuplicateRequest => "duplicate_request",
            Self::Persistence(_) => "persistence",
        }
    }
}

impl From<WorkflowError> for UpstacError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::NotFound { .. } => UpstacError::NotFound(err.to_string()),
            WorkflowError::Validation(_) | WorkflowError::DuplicateRequest => {
                UpstacError::ValidationError(err.to_string())
            }
            WorkflowError::InvalidState { .. } => UpstacError::StateTransitionError(err.to_string()),
            WorkflowError::Persistence(_) => UpstacError::DatabaseError(err.to_string()),
        }
    }
}

impl From<PersistenceError> for UpstacError {
    fn from(err: PersistenceError) -> Self {
        UpstacError::DatabaseError(err.to_string())
    }
}
