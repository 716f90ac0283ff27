//! # Web Adapters
//!
//! Transport-agnostic handlers for lab testers, doctors and requesters. Each
//! handler resolves the caller through [`CurrentUser`], runs one workflow
//! operation and returns an [`ApiError`] carrying the HTTP status to send.

pub mod auth;
pub mod handlers;
pub mod response_types;

pub use auth::{CurrentUser, StaticCurrentUser};
pub use handlers::{ConsultationHandler, LabRequestHandler, TestRequestHandler};
pub use response_types::{ApiError, ApiResult};
