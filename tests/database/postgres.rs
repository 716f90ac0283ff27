//! Round trips through the PostgreSQL store. Each test gets its own database
//! with `migrations/` applied.

use crate::common::*;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;
use upstac_core::database::{DatabaseConnection, PgTestRequestStore};
use upstac_core::events::EventPublisher;
use upstac_core::models::{DoctorSuggestion, NewTestRequest, RequestFlow, TestStatus};
use upstac_core::state_machine::{
    PersistenceError, RequestStatus, TestRequestStore, TestRequestWorkflow, WorkflowError,
};

fn pg_workflow(pool: &PgPool) -> (Arc<PgTestRequestStore>, TestRequestWorkflow) {
    let store = Arc::new(PgTestRequestStore::new(pool.clone()));
    let workflow = TestRequestWorkflow::new(store.clone(), EventPublisher::default());
    (store, workflow)
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_health_check(pool: PgPool) {
    let db = DatabaseConnection::from_pool(pool);
    assert!(db.health_check().await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_full_lifecycle_round_trip(pool: PgPool) {
    let (store, workflow) = pg_workflow(&pool);

    let created = workflow
        .create_test_request(request_input("pg@somedomain.com", "123456789"), &requester())
        .await
        .unwrap();
    let id = created.request_id;

    workflow.assign_for_lab_test(id, &tester()).await.unwrap();
    workflow
        .update_lab_test(id, lab_result_input(), &tester())
        .await
        .unwrap();
    workflow.assign_for_consultation(id, &doctor()).await.unwrap();
    workflow
        .update_consultation(id, consultation_input(), &doctor())
        .await
        .unwrap();

    let stored = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Completed);
    assert_eq!(stored.created_by, requester());
    assert_eq!(stored.pin_code, 716768);
    let lab_result = stored.lab_result.as_ref().unwrap();
    assert_eq!(lab_result.tester, tester());
    assert_eq!(lab_result.result, Some(TestStatus::Negative));
    let consultation = stored.consultation.as_ref().unwrap();
    assert_eq!(consultation.doctor, doctor());
    assert_eq!(consultation.suggestion, Some(DoctorSuggestion::NoIssues));
    assert!(stored.satisfies_status_invariants());

    let history = workflow.flow_history(id).await.unwrap();
    let statuses: Vec<RequestStatus> = history.iter().map(|flow| flow.to_status).collect();
    assert_eq!(statuses, RequestStatus::ALL.to_vec());

    assert_eq!(store.find_by_doctor(doctor().id).await.unwrap().len(), 1);
    assert!(store
        .find_active_by_email_or_phone("pg@somedomain.com", "0")
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_conditional_update_rejects_stale_status(pool: PgPool) {
    let (store, workflow) = pg_workflow(&pool);
    let new_request = NewTestRequest::from_input(
        request_input("stale@somedomain.com", "987654321"),
        requester(),
        NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
    );
    let snapshot = store.insert(new_request).await.unwrap();

    workflow
        .assign_for_lab_test(snapshot.request_id, &tester())
        .await
        .unwrap();

    let mut stale = snapshot.clone();
    stale.status = RequestStatus::LabTestInProgress;
    let flow = RequestFlow::new(
        snapshot.request_id,
        Some(RequestStatus::Initiated),
        RequestStatus::LabTestInProgress,
        doctor(),
    );
    let err = store
        .save_transition(&stale, RequestStatus::Initiated, flow)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::ConcurrentModification {
            actual: RequestStatus::LabTestInProgress,
            ..
        }
    ));
    assert_eq!(
        workflow
            .flow_history(snapshot.request_id)
            .await
            .unwrap()
            .len(),
        2
    );

    let err = workflow.assign_for_lab_test(-34, &tester()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound { .. }));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_save_transition_returns_committed_row(pool: PgPool) {
    let (store, workflow) = pg_workflow(&pool);
    let request = workflow
        .create_test_request(request_input("saved@somedomain.com", "246813579"), &requester())
        .await
        .unwrap();

    let assigned = workflow
        .assign_for_lab_test(request.request_id, &tester())
        .await
        .unwrap();
    let stored = store.find_by_id(request.request_id).await.unwrap().unwrap();
    assert_eq!(assigned, stored);

    let completed = workflow
        .update_lab_test(request.request_id, lab_result_input(), &tester())
        .await
        .unwrap();
    let stored = store.find_by_id(request.request_id).await.unwrap().unwrap();
    assert_eq!(completed, stored);
    assert_eq!(stored.status, RequestStatus::LabTestCompleted);
}
