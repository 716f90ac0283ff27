//! In-process [`TestRequestStore`] backed by `dashmap`.
//!
//! `save_transition` holds the entry's shard lock while it compares the status
//! and writes, so two racing transitions on the same request cannot both commit.

use crate::models::{NewTestRequest, RequestFlow, TestRequest};
use crate::state_machine::errors::{PersistenceError, PersistenceResult};
use crate::state_machine::persistence::TestRequestStore;
use crate::state_machine::states::RequestStatus;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug)]
pub struct InMemoryTestRequestStore {
    requests: DashMap<i64, TestRequest>,
    flows: RwLock<Vec<RequestFlow>>,
    next_id: AtomicI64,
}

impl Default for InMemoryTestRequestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTestRequestStore {
    pub fn new() -> Self {
        Self {
            requests: DashMap::new(),
            flows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Place a request as-is, bypassing the workflow. Used to load fixtures.
    pub fn seed(&self, request: TestRequest) {
        self.next_id
            .fetch_max(request.request_id + 1, Ordering::SeqCst);
        self.requests.insert(request.request_id, request);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn collect_sorted<F>(&self, predicate: F) -> Vec<TestRequest>
    where
        F: Fn(&TestRequest) -> bool,
    {
        let mut matches: Vec<TestRequest> = self
            .requests
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|request| request.request_id);
        matches
    }
}

#[async_trait]
impl TestRequestStore for InMemoryTestRequestStore {
    async fn find_by_id(&self, request_id: i64) -> PersistenceResult<Option<TestRequest>> {
        Ok(self
            .requests
            .get(&request_id)
            .map(|entry| entry.value().clone()))
    }

    async fn insert(&self, request: NewTestRequest) -> PersistenceResult<TestRequest> {
        let request_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = request.into_request(request_id);
        let flow = RequestFlow::new(
            request_id,
            None,
            request.status,
            request.created_by.clone(),
        );

        self.requests.insert(request_id, request.clone());
        self.flows.write().push(flow);
        Ok(request)
    }

    async fn save_transition(
        &self,
        request: &TestRequest,
        expected_status: RequestStatus,
        flow: RequestFlow,
    ) -> PersistenceResult<TestRequest> {
        let mut entry = self
            .requests
            .get_mut(&request.request_id)
            .ok_or(PersistenceError::Missing {
                request_id: request.request_id,
            })?;

        if entry.status != expected_status {
            return Err(PersistenceError::ConcurrentModification {
                request_id: request.request_id,
                expected: expected_status,
                actual: entry.status,
            });
        }

        *entry = request.clone();
        self.flows.write().push(flow);
        Ok(request.clone())
    }

    async fn find_by_status(&self, status: RequestStatus) -> PersistenceResult<Vec<TestRequest>> {
        Ok(self.collect_sorted(|request| request.status == status))
    }

    async fn find_by_tester(&self, tester_id: i64) -> PersistenceResult<Vec<TestRequest>> {
        Ok(self.collect_sorted(|request| request.tester_id() == Some(tester_id)))
    }

    async fn find_by_doctor(&self, doctor_id: i64) -> PersistenceResult<Vec<TestRequest>> {
        Ok(self.collect_sorted(|request| request.doctor_id() == Some(doctor_id)))
    }

    async fn find_by_created_by(&self, user_id: i64) -> PersistenceResult<Vec<TestRequest>> {
        Ok(self.collect_sorted(|request| request.created_by.id == user_id))
    }

    async fn find_active_by_email_or_phone(
        &self,
        email: &str,
        phone_number: &str,
    ) -> PersistenceResult<Vec<TestRequest>> {
        Ok(self.collect_sorted(|request| {
            !request.status.is_terminal()
                && (request.email == email || request.phone_number == phone_number)
        }))
    }

    async fn flow_history(&self, request_id: i64) -> PersistenceResult<Vec<RequestFlow>> {
        Ok(self
            .flows
            .read()
            .iter()
            .filter(|flow| flow.request_id == request_id)
            .cloned()
            .collect())
    }
}
