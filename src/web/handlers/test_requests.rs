//! # Test Request Handlers
//!
//! Request creation and the requester's own views.

use super::require_user;
use crate::models::{CreateTestRequest, RequestFlow, TestRequest};
use crate::state_machine::TestRequestWorkflow;
use crate::web::auth::CurrentUser;
use crate::web::response_types::ApiResult;
use std::sync::Arc;

#[derive(Clone)]
pub struct TestRequestHandler {
    workflow: Arc<TestRequestWorkflow>,
    identity: Arc<dyn CurrentUser>,
}

impl TestRequestHandler {
    pub fn new(workflow: Arc<TestRequestWorkflow>, identity: Arc<dyn CurrentUser>) -> Self {
        Self { workflow, identity }
    }

    pub async fn create_request(&self, input: CreateTestRequest) -> ApiResult<TestRequest> {
        let user = require_user(self.identity.as_ref())?;
        Ok(self.workflow.create_test_request(input, &user).await?)
    }

    pub async fn my_requests(&self) -> ApiResult<Vec<TestRequest>> {
        let user = require_user(self.identity.as_ref())?;
        Ok(self.workflow.requests_created_by(&user).await?)
    }

    pub async fn flow_history(&self, request_id: i64) -> ApiResult<Vec<RequestFlow>> {
        require_user(self.identity.as_ref())?;
        Ok(self.workflow.flow_history(request_id).await?)
    }
}
