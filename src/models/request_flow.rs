//! # Request Flow
//!
//! Audit trail of status transitions. One row is written in the same atomic
//! unit as the transition it records.

use super::user::User;
use crate::state_machine::states::RequestStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFlow {
    pub request_id: i64,
    /// `None` for the creation entry.
    pub from_status: Option<RequestStatus>,
    pub to_status: RequestStatus,
    pub changed_by: User,
    pub happened_on: DateTime<Utc>,
}

impl RequestFlow {
    pub fn new(
        request_id: i64,
        from_status: Option<RequestStatus>,
        to_status: RequestStatus,
        changed_by: User,
    ) -> Self {
        Self {
            request_id,
            from_status,
            to_status,
            changed_by,
            happened_on: Utc::now(),
        }
    }
}
