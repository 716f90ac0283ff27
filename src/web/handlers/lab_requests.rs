//! # Lab Request Handlers
//!
//! Operations available to lab testers.

use super::require_user;
use crate::models::{CreateLabResult, TestRequest};
use crate::state_machine::TestRequestWorkflow;
use crate::web::auth::CurrentUser;
use crate::web::response_types::ApiResult;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct LabRequestHandler {
    workflow: Arc<TestRequestWorkflow>,
    identity: Arc<dyn CurrentUser>,
}

impl LabRequestHandler {
    pub fn new(workflow: Arc<TestRequestWorkflow>, identity: Arc<dyn CurrentUser>) -> Self {
        Self { workflow, identity }
    }

    /// Requests in `INITIATED`, waiting for a tester.
    pub async fn pending_lab_tests(&self) -> ApiResult<Vec<TestRequest>> {
        require_user(self.identity.as_ref())?;
        Ok(self.workflow.pending_lab_tests().await?)
    }

    /// Requests whose lab result is owned by the caller.
    pub async fn my_lab_tests(&self) -> ApiResult<Vec<TestRequest>> {
        let tester = require_user(self.identity.as_ref())?;
        Ok(self.workflow.assigned_to_tester(&tester).await?)
    }

    pub async fn assign_for_lab_test(&self, request_id: i64) -> ApiResult<TestRequest> {
        let tester = require_user(self.identity.as_ref())?;
        info!(request_id = request_id, tester_id = tester.id, "Assigning lab test");
        Ok(self
            .workflow
            .assign_for_lab_test(request_id, &tester)
            .await?)
    }

    pub async fn update_lab_test(
        &self,
        request_id: i64,
        input: CreateLabResult,
    ) -> ApiResult<TestRequest> {
        let tester = require_user(self.identity.as_ref())?;
        Ok(self
            .workflow
            .update_lab_test(request_id, input, &tester)
            .await?)
    }
}
