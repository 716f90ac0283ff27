//! # Lab Result
//!
//! Vitals and outcome recorded by lab staff for a single test request.
//!
//! A `LabResult` is attached empty when a tester is assigned
//! (`LAB_TEST_IN_PROGRESS`) and populated exactly once when the tester
//! submits a [`CreateLabResult`]. It never changes after that.

use super::user::User;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a COVID test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Positive,
    Negative,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "POSITIVE"),
            Self::Negative => write!(f, "NEGATIVE"),
        }
    }
}

impl std::str::FromStr for TestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POSITIVE" => Ok(Self::Positive),
            "NEGATIVE" => Ok(Self::Negative),
            _ => Err(format!("Invalid test status: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabResult {
    pub tester: User,
    pub blood_pressure: Option<String>,
    pub heart_beat: Option<String>,
    pub temperature: Option<String>,
    pub oxygen_level: Option<String>,
    pub comments: Option<String>,
    pub result: Option<TestStatus>,
    pub updated_on: Option<NaiveDate>,
}

impl LabResult {
    /// Empty result owned by `tester`, attached at assignment time.
    pub fn assigned_to(tester: User) -> Self {
        Self {
            tester,
            blood_pressure: None,
            heart_beat: None,
            temperature: None,
            oxygen_level: None,
            comments: None,
            result: None,
            updated_on: None,
        }
    }

    /// Whether the tester has submitted the outcome yet.
    pub fn is_recorded(&self) -> bool {
        self.result.is_some()
    }
}

/// Payload submitted by a tester to complete a lab test.
///
/// Fields are optional so that missing values reach validation instead of
/// failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateLabResult {
    pub blood_pressure: Option<String>,
    pub heart_beat: Option<String>,
    pub temperature: Option<String>,
    pub oxygen_level: Option<String>,
    pub comments: Option<String>,
    pub result: Option<TestStatus>,
}
