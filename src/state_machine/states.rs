use super::events::WorkflowOperation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a test request.
///
/// Declaration order is lifecycle order, so `Ord` compares progress.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Created by the requester, waiting for a lab tester
    #[default]
    Initiated,
    /// Assigned to a tester; empty lab result attached
    LabTestInProgress,
    /// Lab result recorded, waiting for a doctor
    LabTestCompleted,
    /// Assigned to a doctor; empty consultation attached
    DiagnosisInProcess,
    /// Consultation recorded
    Completed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        Self::Initiated,
        Self::LabTestInProgress,
        Self::LabTestCompleted,
        Self::DiagnosisInProcess,
        Self::Completed,
    ];

    /// The single operation permitted from this status.
    pub fn allowed_operation(&self) -> Option<WorkflowOperation> {
        match self {
            Self::Initiated => Some(WorkflowOperation::AssignForLabTest),
            Self::LabTestInProgress => Some(WorkflowOperation::UpdateLabTest),
            Self::LabTestCompleted => Some(WorkflowOperation::AssignForConsultation),
            Self::DiagnosisInProcess => Some(WorkflowOperation::UpdateConsultation),
            Self::Completed => None,
        }
    }

    /// The status reached by the permitted operation.
    pub fn next(&self) -> Option<RequestStatus> {
        match self {
            Self::Initiated => Some(Self::LabTestInProgress),
            Self::LabTestInProgress => Some(Self::LabTestCompleted),
            Self::LabTestCompleted => Some(Self::DiagnosisInProcess),
            Self::DiagnosisInProcess => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiated => write!(f, "INITIATED"),
            Self::LabTestInProgress => write!(f, "LAB_TEST_IN_PROGRESS"),
            Self::LabTestCompleted => write!(f, "LAB_TEST_COMPLETED"),
            Self::DiagnosisInProcess => write!(f, "DIAGNOSIS_IN_PROCESS"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INITIATED" => Ok(Self::Initiated),
            "LAB_TEST_IN_PROGRESS" => Ok(Self::LabTestInProgress),
            "LAB_TEST_COMPLETED" => Ok(Self::LabTestCompleted),
            "DIAGNOSIS_IN_PROCESS" => Ok(Self::DiagnosisInProcess),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("Invalid request status: {s}")),
        }
    }
}
