#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # UPSTAC Core
//!
//! Test request management for COVID-19 testing: citizens open a request, a lab
//! tester records vitals and a result, and a doctor closes it out with a
//! suggestion.
//!
//! ## Lifecycle
//!
//! ```text
//! INITIATED -> LAB_TEST_IN_PROGRESS -> LAB_TEST_COMPLETED -> DIAGNOSIS_IN_PROCESS -> COMPLETED
//! ```
//!
//! Every status has at most one operation that moves it forward. Transitions
//! are committed with a compare-and-set on the status the caller read, so two
//! actors racing on the same request cannot both succeed.
//!
//! ## Module Organization
//!
//! - [`state_machine`] - Statuses, events, transition table and the workflow service
//! - [`models`] - Test requests, lab results, consultations and the audit flow
//! - [`validation`] - Field-by-field payload validation
//! - [`database`] - PostgreSQL and in-memory stores
//! - [`events`] - Lifecycle event broadcasting
//! - [`web`] - Handlers for testers, doctors and requesters
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Crate-level error type
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use upstac_core::database::InMemoryTestRequestStore;
//! use upstac_core::events::EventPublisher;
//! use upstac_core::models::User;
//! use upstac_core::state_machine::TestRequestWorkflow;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = TestRequestWorkflow::new(
//!     Arc::new(InMemoryTestRequestStore::new()),
//!     EventPublisher::default(),
//! );
//!
//! let tester = User::new(2, "tester");
//! let request = workflow.assign_for_lab_test(1, &tester).await?;
//! println!("request {} is now {}", request.request_id, request.status);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod state_machine;
pub mod validation;
pub mod web;

pub use config::{DatabaseConfig, EventConfig, LoggingConfig, UpstacConfig};
pub use error::{Result, UpstacError};
pub use events::{EventPublisher, PublishedEvent};
pub use models::{
    Consultation, CreateConsultationRequest, CreateLabResult, CreateTestRequest,
    DoctorSuggestion, LabResult, RequestFlow, TestRequest, TestStatus, User,
};
pub use state_machine::{RequestStatus, TestRequestWorkflow, WorkflowError, WorkflowResult};
pub use validation::ValidationErrors;
