use super::states::RequestStatus;
use crate::models::{CreateConsultationRequest, CreateLabResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four public workflow operations, without their payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowOperation {
    AssignForLabTest,
    UpdateLabTest,
    AssignForConsultation,
    UpdateConsultation,
}

impl WorkflowOperation {
    /// Status the request must be in for this operation to apply.
    pub fn required_status(&self) -> RequestStatus {
        match self {
            Self::AssignForLabTest => RequestStatus::Initiated,
            Self::UpdateLabTest => RequestStatus::LabTestInProgress,
            Self::AssignForConsultation => RequestStatus::LabTestCompleted,
            Self::UpdateConsultation => RequestStatus::DiagnosisInProcess,
        }
    }

    /// Status the request is in after this operation.
    pub fn target_status(&self) -> RequestStatus {
        match self {
            Self::AssignForLabTest => RequestStatus::LabTestInProgress,
            Self::UpdateLabTest => RequestStatus::LabTestCompleted,
            Self::AssignForConsultation => RequestStatus::DiagnosisInProcess,
            Self::UpdateConsultation => RequestStatus::Completed,
        }
    }

    /// Name of the lifecycle event published after a committed transition.
    pub fn lifecycle_event_name(&self) -> &'static str {
        match self {
            Self::AssignForLabTest => "test_request.lab_test_assigned",
            Self::UpdateLabTest => "test_request.lab_test_completed",
            Self::AssignForConsultation => "test_request.consultation_assigned",
            Self::UpdateConsultation => "test_request.completed",
        }
    }
}

impl fmt::Display for WorkflowOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssignForLabTest => write!(f, "assign_for_lab_test"),
            Self::UpdateLabTest => write!(f, "update_lab_test"),
            Self::AssignForConsultation => write!(f, "assign_for_consultation"),
            Self::UpdateConsultation => write!(f, "update_consultation"),
        }
    }
}

/// Events that trigger request status transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RequestEvent {
    /// Tester picks up an initiated request
    AssignForLabTest,
    /// Tester submits vitals and outcome
    UpdateLabTest(CreateLabResult),
    /// Doctor picks up a request with a recorded lab result
    AssignForConsultation,
    /// Doctor submits a suggestion
    UpdateConsultation(CreateConsultationRequest),
}

impl RequestEvent {
    pub fn operation(&self) -> WorkflowOperation {
        match self {
            Self::AssignForLabTest => WorkflowOperation::AssignForLabTest,
            Self::UpdateLabTest(_) => WorkflowOperation::UpdateLabTest,
            Self::AssignForConsultation => WorkflowOperation::AssignForConsultation,
            Self::UpdateConsultation(_) => WorkflowOperation::UpdateConsultation,
        }
    }
}
