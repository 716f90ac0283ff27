//! Input validation for workflow payloads.
//!
//! Each validator checks every field and reports all violations at once, so a
//! caller sees the complete list of problems in a single error.

use crate::models::{CreateConsultationRequest, CreateLabResult, CreateTestRequest};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// All violations found in one payload. Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", format_violations(.violations))]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldViolation { field, message });
    }

    fn require_text(&mut self, field: &'static str, value: Option<&str>) {
        match value {
            None => self.push(field, "must not be null"),
            Some(v) if v.trim().is_empty() => self.push(field, "must not be empty"),
            Some(_) => {}
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { violations: self.0 })
        }
    }
}

/// Vitals must all be present and non-blank; `result` must be set.
pub fn validate_lab_result(input: &CreateLabResult) -> Result<(), ValidationErrors> {
    let mut violations = Violations::default();
    violations.require_text("blood_pressure", input.blood_pressure.as_deref());
    violations.require_text("heart_beat", input.heart_beat.as_deref());
    violations.require_text("temperature", input.temperature.as_deref());
    violations.require_text("oxygen_level", input.oxygen_level.as_deref());
    violations.require_text("comments", input.comments.as_deref());
    if input.result.is_none() {
        violations.push("result", "must not be null");
    }
    violations.finish()
}

/// `suggestion` is required; comments are free text and may be omitted.
pub fn validate_consultation(input: &CreateConsultationRequest) -> Result<(), ValidationErrors> {
    let mut violations = Violations::default();
    if input.suggestion.is_none() {
        violations.push("suggestion", "must not be null");
    }
    violations.finish()
}

pub const MAX_AGE: u32 = 150;
pub const MAX_PIN_CODE: u32 = 999_999;

/// Contact fields are required; `age` and `pin_code` must fit their stored ranges.
pub fn validate_test_request(input: &CreateTestRequest) -> Result<(), ValidationErrors> {
    let mut violations = Violations::default();
    violations.require_text("name", Some(&input.name));
    violations.require_text("email", Some(&input.email));
    violations.require_text("phone_number", Some(&input.phone_number));
    violations.require_text("address", Some(&input.address));
    if !input.email.trim().is_empty() && !input.email.contains('@') {
        violations.push("email", "must be a well-formed email address");
    }
    if !input.phone_number.chars().all(|c| c.is_ascii_digit()) {
        violations.push("phone_number", "must contain only digits");
    }
    if input.age == 0 {
        violations.push("age", "must be greater than 0");
    } else if input.age > MAX_AGE {
        violations.push("age", "must be at most 150");
    }
    if input.pin_code == 0 {
        violations.push("pin_code", "must be greater than 0");
    } else if input.pin_code > MAX_PIN_CODE {
        violations.push("pin_code", "must have at most six digits");
    }
    violations.finish()
}
