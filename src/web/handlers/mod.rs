//! # Request Handlers
//!
//! Thin adapters over [`TestRequestWorkflow`](crate::state_machine::TestRequestWorkflow):
//! resolve the caller, invoke one workflow operation, translate the error.

pub mod consultations;
pub mod lab_requests;
pub mod test_requests;

pub use consultations::ConsultationHandler;
pub use lab_requests::LabRequestHandler;
pub use test_requests::TestRequestHandler;

use super::auth::CurrentUser;
use super::response_types::{ApiError, ApiResult};
use crate::models::User;
use tracing::debug;

pub(crate) fn require_user(identity: &dyn CurrentUser) -> ApiResult<User> {
    identity.current_user().ok_or_else(|| {
        debug!("Rejected request without an authenticated user");
        ApiError::Unauthorized
    })
}
