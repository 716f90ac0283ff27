use super::errors::PersistenceResult;
use super::states::RequestStatus;
use crate::models::{NewTestRequest, RequestFlow, TestRequest};
use async_trait::async_trait;

/// Backing store for test requests and their transition history.
///
/// `save_transition` is the only write path for an existing request. It must
/// commit the new request state and the flow entry together, and only if the
/// persisted status still equals `expected_status`; otherwise it returns
/// [`PersistenceError::ConcurrentModification`](super::errors::PersistenceError::ConcurrentModification)
/// and writes nothing.
#[async_trait]
pub trait TestRequestStore: Send + Sync {
    async fn find_by_id(&self, request_id: i64) -> PersistenceResult<Option<TestRequest>>;

    /// Insert a new `INITIATED` request and its creation flow entry.
    async fn insert(&self, request: NewTestRequest) -> PersistenceResult<TestRequest>;

    async fn save_transition(
        &self,
        request: &TestRequest,
        expected_status: RequestStatus,
        flow: RequestFlow,
    ) -> PersistenceResult<TestRequest>;

    async fn find_by_status(&self, status: RequestStatus) -> PersistenceResult<Vec<TestRequest>>;

    /// Requests whose lab result belongs to `tester_id`.
    async fn find_by_tester(&self, tester_id: i64) -> PersistenceResult<Vec<TestRequest>>;

    /// Requests whose consultation belongs to `doctor_id`.
    async fn find_by_doctor(&self, doctor_id: i64) -> PersistenceResult<Vec<TestRequest>>;

    async fn find_by_created_by(&self, user_id: i64) -> PersistenceResult<Vec<TestRequest>>;

    /// Requests not yet `COMPLETED` that use `email` or `phone_number`.
    async fn find_active_by_email_or_phone(
        &self,
        email: &str,
        phone_number: &str,
    ) -> PersistenceResult<Vec<TestRequest>>;

    /// Flow entries for a request, oldest first.
    async fn flow_history(&self, request_id: i64) -> PersistenceResult<Vec<RequestFlow>>;
}
