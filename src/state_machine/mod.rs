// Test request status state machine
//
// Forward-only lifecycle INITIATED -> LAB_TEST_IN_PROGRESS -> LAB_TEST_COMPLETED
// -> DIAGNOSIS_IN_PROCESS -> COMPLETED, driven by lab testers and doctors.

pub mod actions;
pub mod errors;
pub mod events;
pub mod persistence;
pub mod states;
pub mod workflow;

// Re-export main types for convenient access
pub use errors::{PersistenceError, PersistenceResult, WorkflowError, WorkflowResult};
pub use events::{RequestEvent, WorkflowOperation};
pub use states::RequestStatus;
pub use workflow::{determine_target_state, TestRequestWorkflow};

// Common traits
pub use actions::StateAction;
pub use persistence::TestRequestStore;
