//! # Models
//!
//! Domain records for test requests and the sub-records attached to them.

pub mod consultation;
pub mod lab_result;
pub mod request_flow;
pub mod test_request;
pub mod user;

pub use consultation::{Consultation, CreateConsultationRequest, DoctorSuggestion};
pub use lab_result::{CreateLabResult, LabResult, TestStatus};
pub use request_flow::RequestFlow;
pub use test_request::{CreateTestRequest, Gender, NewTestRequest, TestRequest};
pub use user::User;
