use crate::common::*;
use std::sync::Arc;
use upstac_core::models::CreateConsultationRequest;
use upstac_core::state_machine::RequestStatus;
use upstac_core::web::{
    ApiError, ConsultationHandler, LabRequestHandler, StaticCurrentUser, TestRequestHandler,
};

struct Handlers {
    requests: TestRequestHandler,
    lab: LabRequestHandler,
    consultations: ConsultationHandler,
    doctor_identity: Arc<StaticCurrentUser>,
}

fn handlers(harness: &TestHarness) -> Handlers {
    let doctor_identity = Arc::new(StaticCurrentUser::new(doctor()));
    Handlers {
        requests: TestRequestHandler::new(
            harness.workflow.clone(),
            Arc::new(StaticCurrentUser::new(requester())),
        ),
        lab: LabRequestHandler::new(
            harness.workflow.clone(),
            Arc::new(StaticCurrentUser::new(tester())),
        ),
        consultations: ConsultationHandler::new(harness.workflow.clone(), doctor_identity.clone()),
        doctor_identity,
    }
}

#[tokio::test]
async fn test_lifecycle_through_handlers() {
    let harness = TestHarness::new();
    let api = handlers(&harness);

    let created = api
        .requests
        .create_request(request_input("web@somedomain.com", "123456789"))
        .await
        .unwrap();
    let id = created.request_id;

    api.lab.assign_for_lab_test(id).await.unwrap();
    let lab_done = api.lab.update_lab_test(id, lab_result_input()).await.unwrap();
    assert_eq!(lab_done.status, RequestStatus::LabTestCompleted);

    let pending = api.consultations.pending_consultations().await.unwrap();
    assert_eq!(pending.len(), 1);

    api.consultations.assign_for_consultation(id).await.unwrap();
    assert_eq!(api.consultations.my_consultations().await.unwrap().len(), 1);

    let completed = api
        .consultations
        .update_consultation(id, consultation_input())
        .await
        .unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);

    let mine = api.requests.my_requests().await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, RequestStatus::Completed);
    assert_eq!(api.requests.flow_history(id).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_handler_error_statuses() {
    let harness = TestHarness::new();
    let api = handlers(&harness);

    let err = api
        .consultations
        .assign_for_consultation(UNKNOWN_REQUEST_ID)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.to_json()["error"]["code"], "NOT_FOUND");

    let request = harness
        .request_in_status(RequestStatus::DiagnosisInProcess)
        .await;
    let err = api
        .consultations
        .update_consultation(request.request_id, CreateConsultationRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = api
        .lab
        .assign_for_lab_test(request.request_id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);
    assert!(err.to_string().contains("DIAGNOSIS_IN_PROCESS"));

    api.doctor_identity.sign_out();
    let err = api
        .consultations
        .update_consultation(request.request_id, consultation_input())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(err.status_code(), 401);
}
