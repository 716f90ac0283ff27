//! # Test Request Model
//!
//! A citizen's request for COVID testing and the sub-records that accumulate on
//! it as it moves through the workflow.
//!
//! ## Status Invariants
//!
//! The status alone tells which sub-records exist:
//!
//! | status                  | `lab_result`        | `consultation`      |
//! |-------------------------|---------------------|---------------------|
//! | `INITIATED`             | absent              | absent              |
//! | `LAB_TEST_IN_PROGRESS`  | attached, empty     | absent              |
//! | `LAB_TEST_COMPLETED`    | recorded            | absent              |
//! | `DIAGNOSIS_IN_PROCESS`  | recorded            | attached, empty     |
//! | `COMPLETED`             | recorded            | recorded            |
//!
//! Only [`TestRequestWorkflow`](crate::state_machine::TestRequestWorkflow)
//! changes `status`, `lab_result` and `consultation`.

use super::consultation::Consultation;
use super::lab_result::LabResult;
use super::user::User;
use crate::state_machine::states::RequestStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "MALE"),
            Self::Female => write!(f, "FEMALE"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Self::Male),
            "FEMALE" => Ok(Self::Female),
            "OTHER" => Ok(Self::Other),
            _ => Err(format!("Invalid gender: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRequest {
    pub request_id: i64,
    pub name: String,
    pub created: NaiveDate,
    pub age: u32,
    pub email: String,
    pub phone_number: String,
    pub pin_code: u32,
    pub address: String,
    pub gender: Gender,
    pub status: RequestStatus,
    pub created_by: User,
    pub lab_result: Option<LabResult>,
    pub consultation: Option<Consultation>,
}

impl TestRequest {
    /// Check the status/sub-record invariants from the module docs.
    pub fn satisfies_status_invariants(&self) -> bool {
        let lab_ok = match self.status {
            RequestStatus::Initiated => self.lab_result.is_none(),
            RequestStatus::LabTestInProgress => self
                .lab_result
                .as_ref()
                .is_some_and(|result| !result.is_recorded()),
            _ => self
                .lab_result
                .as_ref()
                .is_some_and(LabResult::is_recorded),
        };

        let consultation_ok = match self.status {
            RequestStatus::Initiated
            | RequestStatus::LabTestInProgress
            | RequestStatus::LabTestCompleted => self.consultation.is_none(),
            RequestStatus::DiagnosisInProcess => self
                .consultation
                .as_ref()
                .is_some_and(|c| c.suggestion.is_none()),
            RequestStatus::Completed => self
                .consultation
                .as_ref()
                .is_some_and(|c| c.suggestion.is_some()),
        };

        lab_ok && consultation_ok
    }

    /// Id of the tester the request is assigned to, if any.
    pub fn tester_id(&self) -> Option<i64> {
        self.lab_result.as_ref().map(|result| result.tester.id)
    }

    /// Id of the doctor the request is assigned to, if any.
    pub fn doctor_id(&self) -> Option<i64> {
        self.consultation.as_ref().map(|c| c.doctor.id)
    }
}

/// Payload submitted by a citizen to open a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTestRequest {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub phone_number: String,
    pub pin_code: u32,
    pub address: String,
    pub gender: Gender,
}

/// Validated request ready to be inserted; the store assigns `request_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestRequest {
    pub name: String,
    pub created: NaiveDate,
    pub age: u32,
    pub email: String,
    pub phone_number: String,
    pub pin_code: u32,
    pub address: String,
    pub gender: Gender,
    pub created_by: User,
}

impl NewTestRequest {
    pub fn from_input(input: CreateTestRequest, created_by: User, created: NaiveDate) -> Self {
        Self {
            name: input.name,
            created,
            age: input.age,
            email: input.email,
            phone_number: input.phone_number,
            pin_code: input.pin_code,
            address: input.address,
            gender: input.gender,
            created_by,
        }
    }

    /// Materialize with a store-assigned id; new requests always start `INITIATED`.
    pub fn into_request(self, request_id: i64) -> TestRequest {
        TestRequest {
            request_id,
            name: self.name,
            created: self.created,
            age: self.age,
            email: self.email,
            phone_number: self.phone_number,
            pin_code: self.pin_code,
            address: self.address,
            gender: self.gender,
            status: RequestStatus::Initiated,
            created_by: self.created_by,
            lab_result: None,
            consultation: None,
        }
    }
}
