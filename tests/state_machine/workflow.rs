use crate::common::*;
use upstac_core::models::{CreateConsultationRequest, DoctorSuggestion, TestStatus, User};
use upstac_core::state_machine::{RequestStatus, TestRequestStore, WorkflowError};

#[tokio::test]
async fn test_assign_for_lab_test_from_initiated() {
    let harness = TestHarness::new();
    let request = harness.create_request().await;
    assert_eq!(request.status, RequestStatus::Initiated);

    let assigned = harness
        .workflow
        .assign_for_lab_test(request.request_id, &tester())
        .await
        .unwrap();

    assert_eq!(assigned.status, RequestStatus::LabTestInProgress);
    let lab_result = assigned.lab_result.as_ref().expect("lab result attached");
    assert_eq!(lab_result.tester, tester());
    assert!(!lab_result.is_recorded());
    assert!(assigned.satisfies_status_invariants());
}

#[tokio::test]
async fn test_assign_for_lab_test_succeeds_only_once() {
    let harness = TestHarness::new();
    let request = harness.create_request().await;

    harness
        .workflow
        .assign_for_lab_test(request.request_id, &tester())
        .await
        .unwrap();
    let err = harness
        .workflow
        .assign_for_lab_test(request.request_id, &User::new(9, "another"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::InvalidState {
            current: RequestStatus::LabTestInProgress,
            expected: RequestStatus::Initiated,
            ..
        }
    ));
    let stored = harness
        .store
        .find_by_id(request.request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.tester_id(), Some(tester().id));
}

#[tokio::test]
async fn test_assign_for_lab_test_rejected_from_every_other_status() {
    let harness = TestHarness::new();
    for status in &RequestStatus::ALL[1..] {
        let request = harness.request_in_status(*status).await;
        let err = harness
            .workflow
            .assign_for_lab_test(request.request_id, &tester())
            .await
            .unwrap_err();
        match err {
            WorkflowError::InvalidState { current, .. } => assert_eq!(current, *status),
            other => panic!("expected InvalidState from {status}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_every_operation_rejects_unknown_id() {
    let harness = TestHarness::new();
    let workflow = &harness.workflow;
    let id = UNKNOWN_REQUEST_ID;

    let errors = vec![
        workflow.assign_for_lab_test(id, &tester()).await.unwrap_err(),
        workflow
            .update_lab_test(id, lab_result_input(), &tester())
            .await
            .unwrap_err(),
        workflow
            .assign_for_consultation(id, &doctor())
            .await
            .unwrap_err(),
        workflow
            .update_consultation(id, consultation_input(), &doctor())
            .await
            .unwrap_err(),
    ];

    for err in errors {
        assert!(matches!(err, WorkflowError::NotFound { request_id: -34 }));
        assert!(err.to_string().contains("Invalid ID"));
    }
}

#[tokio::test]
async fn test_update_lab_test_requires_result() {
    let harness = TestHarness::new();
    let request = harness
        .request_in_status(RequestStatus::LabTestInProgress)
        .await;

    let mut input = lab_result_input();
    input.result = None;
    let err = harness
        .workflow
        .update_lab_test(request.request_id, input, &tester())
        .await
        .unwrap_err();

    match err {
        WorkflowError::Validation(violations) => {
            assert_eq!(violations.fields(), vec!["result"]);
        }
        other => panic!("expected Validation, got {other:?}"),
    }

    let stored = harness
        .store
        .find_by_id(request.request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, RequestStatus::LabTestInProgress);
}

#[tokio::test]
async fn test_update_lab_test_records_result() {
    let harness = TestHarness::new();
    let request = harness
        .request_in_status(RequestStatus::LabTestInProgress)
        .await;

    let updated = harness
        .workflow
        .update_lab_test(request.request_id, lab_result_input(), &tester())
        .await
        .unwrap();

    assert_eq!(updated.status, RequestStatus::LabTestCompleted);
    let lab_result = updated.lab_result.as_ref().unwrap();
    assert_eq!(lab_result.result, Some(TestStatus::Negative));
    assert_eq!(lab_result.blood_pressure.as_deref(), Some("120"));
    assert!(lab_result.updated_on.is_some());
}

#[tokio::test]
async fn test_update_lab_test_from_wrong_status() {
    let harness = TestHarness::new();
    let request = harness.create_request().await;

    let err = harness
        .workflow
        .update_lab_test(request.request_id, lab_result_input(), &tester())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::InvalidState {
            current: RequestStatus::Initiated,
            expected: RequestStatus::LabTestInProgress,
            ..
        }
    ));
}

#[tokio::test]
async fn test_update_consultation_requires_suggestion() {
    let harness = TestHarness::new();
    let request = harness
        .request_in_status(RequestStatus::DiagnosisInProcess)
        .await;

    let err = harness
        .workflow
        .update_consultation(
            request.request_id,
            CreateConsultationRequest {
                suggestion: None,
                comments: Some("Ok".to_string()),
            },
            &doctor(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(ref v) if v.has_field("suggestion")));

    let completed = harness
        .workflow
        .update_consultation(request.request_id, consultation_input(), &doctor())
        .await
        .unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);
    assert_eq!(
        completed.consultation.as_ref().unwrap().suggestion,
        Some(DoctorSuggestion::NoIssues)
    );
}

#[tokio::test]
async fn test_end_to_end_lifecycle() {
    let harness = TestHarness::new();
    let mut request = harness.create_request().await;
    let original = request.clone();

    let mut seen = vec![request.status];
    let mut recorded_lab_result = None;
    while !request.status.is_terminal() {
        let next = harness.advance(&request).await;
        assert_eq!(Some(next.status), request.status.next());
        assert!(next.satisfies_status_invariants());

        if let Some(lab_result) = &recorded_lab_result {
            assert_eq!(next.lab_result.as_ref(), Some(lab_result));
        }
        if next.status == RequestStatus::LabTestCompleted {
            recorded_lab_result = next.lab_result.clone();
        }

        seen.push(next.status);
        request = next;
    }

    assert_eq!(seen, RequestStatus::ALL.to_vec());
    assert_eq!(request.name, original.name);
    assert_eq!(request.created_by, original.created_by);
    assert_eq!(request.phone_number, original.phone_number);
    assert_eq!(request.tester_id(), Some(tester().id));
    assert_eq!(request.doctor_id(), Some(doctor().id));
}

#[tokio::test]
async fn test_flow_history_records_each_transition() {
    let harness = TestHarness::new();
    let request = harness.request_in_status(RequestStatus::Completed).await;

    let history = harness
        .workflow
        .flow_history(request.request_id)
        .await
        .unwrap();

    assert_eq!(history.len(), 5);
    assert_eq!(history[0].from_status, None);
    assert_eq!(history[0].changed_by, requester());
    for pair in history.windows(2) {
        assert_eq!(pair[1].from_status, Some(pair[0].to_status));
    }
    assert_eq!(history[4].to_status, RequestStatus::Completed);
    assert_eq!(history[4].changed_by, doctor());

    let err = harness
        .workflow
        .flow_history(UNKNOWN_REQUEST_ID)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound { .. }));
}

#[tokio::test]
async fn test_lifecycle_events_published() {
    let harness = TestHarness::new();
    let mut events = harness.publisher.subscribe();

    let request = harness.request_in_status(RequestStatus::Completed).await;

    let mut names = Vec::new();
    while let Ok(event) = events.try_recv() {
        assert_eq!(event.context["request_id"], request.request_id);
        names.push(event.name);
    }
    assert_eq!(
        names,
        vec![
            "test_request.created",
            "test_request.lab_test_assigned",
            "test_request.lab_test_completed",
            "test_request.consultation_assigned",
            "test_request.completed",
        ]
    );
}

#[tokio::test]
async fn test_queues_and_assignments() {
    let harness = TestHarness::new();
    let waiting = harness.create_request().await;
    let in_lab = harness
        .request_in_status(RequestStatus::LabTestInProgress)
        .await;
    let ready_for_doctor = harness
        .request_in_status(RequestStatus::LabTestCompleted)
        .await;
    let with_doctor = harness
        .request_in_status(RequestStatus::DiagnosisInProcess)
        .await;

    let pending: Vec<i64> = harness
        .workflow
        .pending_lab_tests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.request_id)
        .collect();
    assert_eq!(pending, vec![waiting.request_id]);

    let consultations: Vec<i64> = harness
        .workflow
        .pending_consultations()
        .await
        .unwrap()
        .iter()
        .map(|r| r.request_id)
        .collect();
    assert_eq!(consultations, vec![ready_for_doctor.request_id]);

    let tester_queue = harness.workflow.assigned_to_tester(&tester()).await.unwrap();
    assert_eq!(tester_queue.len(), 3);
    assert!(tester_queue.iter().any(|r| r.request_id == in_lab.request_id));

    let doctor_queue = harness.workflow.assigned_to_doctor(&doctor()).await.unwrap();
    assert_eq!(doctor_queue.len(), 1);
    assert_eq!(doctor_queue[0].request_id, with_doctor.request_id);

    let mine = harness
        .workflow
        .requests_created_by(&requester())
        .await
        .unwrap();
    assert_eq!(mine.len(), 4);
}

#[tokio::test]
async fn test_duplicate_request_rejected_until_completed() {
    let harness = TestHarness::new();
    let first = harness
        .create_request_with("dup@somedomain.com", "555000111")
        .await;

    let err = harness
        .workflow
        .create_test_request(request_input("other@somedomain.com", "555000111"), &requester())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::DuplicateRequest));

    let mut request = first;
    while !request.status.is_terminal() {
        request = harness.advance(&request).await;
    }

    let again = harness
        .workflow
        .create_test_request(request_input("dup@somedomain.com", "555000111"), &requester())
        .await
        .unwrap();
    assert_ne!(again.request_id, request.request_id);
    assert_eq!(again.status, RequestStatus::Initiated);
}
