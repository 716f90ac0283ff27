//! # Consultation
//!
//! A doctor's suggestion and comments closing out a test request. Attached
//! empty at `DIAGNOSIS_IN_PROCESS`, populated once at `COMPLETED`.

use super::user::User;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoctorSuggestion {
    NoIssues,
    HomeQuarantine,
    Admit,
}

impl fmt::Display for DoctorSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoIssues => write!(f, "NO_ISSUES"),
            Self::HomeQuarantine => write!(f, "HOME_QUARANTINE"),
            Self::Admit => write!(f, "ADMIT"),
        }
    }
}

impl std::str::FromStr for DoctorSuggestion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NO_ISSUES" => Ok(Self::NoIssues),
            "HOME_QUARANTINE" => Ok(Self::HomeQuarantine),
            "ADMIT" => Ok(Self::Admit),
            _ => Err(format!("Invalid doctor suggestion: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultation {
    pub doctor: User,
    pub suggestion: Option<DoctorSuggestion>,
    pub comments: Option<String>,
    pub updated_on: Option<NaiveDate>,
}

impl Consultation {
    pub fn assigned_to(doctor: User) -> Self {
        Self {
            doctor,
            suggestion: None,
            comments: None,
            updated_on: None,
        }
    }
}

/// Payload submitted by a doctor to close a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateConsultationRequest {
    pub suggestion: Option<DoctorSuggestion>,
    pub comments: Option<String>,
}
