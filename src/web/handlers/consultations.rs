//! # Consultation Handlers
//!
//! Operations available to doctors.

use super::require_user;
use crate::models::{CreateConsultationRequest, TestRequest};
use crate::state_machine::TestRequestWorkflow;
use crate::web::auth::CurrentUser;
use crate::web::response_types::ApiResult;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ConsultationHandler {
    workflow: Arc<TestRequestWorkflow>,
    identity: Arc<dyn CurrentUser>,
}

impl ConsultationHandler {
    pub fn new(workflow: Arc<TestRequestWorkflow>, identity: Arc<dyn CurrentUser>) -> Self {
        Self { workflow, identity }
    }

    /// Requests in `LAB_TEST_COMPLETED`, waiting for a doctor.
    pub async fn pending_consultations(&self) -> ApiResult<Vec<TestRequest>> {
        require_user(self.identity.as_ref())?;
        Ok(self.workflow.pending_consultations().await?)
    }

    pub async fn my_consultations(&self) -> ApiResult<Vec<TestRequest>> {
        let doctor = require_user(self.identity.as_ref())?;
        Ok(self.workflow.assigned_to_doctor(&doctor).await?)
    }

    pub async fn assign_for_consultation(&self, request_id: i64) -> ApiResult<TestRequest> {
        let doctor = require_user(self.identity.as_ref())?;
        info!(request_id = request_id, doctor_id = doctor.id, "Assigning consultation");
        Ok(self
            .workflow
            .assign_for_consultation(request_id, &doctor)
            .await?)
    }

    pub async fn update_consultation(
        &self,
        request_id: i64,
        input: CreateConsultationRequest,
    ) -> ApiResult<TestRequest> {
        let doctor = require_user(self.identity.as_ref())?;
        Ok(self
            .workflow
            .update_consultation(request_id, input, &doctor)
            .await?)
    }
}
