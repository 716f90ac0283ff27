use super::{
    actions::{CommittedTransition, LogTransitionAction, PublishTransitionEventAction, StateAction},
    errors::{PersistenceError, WorkflowError, WorkflowResult},
    events::RequestEvent,
    persistence::TestRequestStore,
    states::RequestStatus,
};
use crate::events::{EventPublisher, REQUEST_CREATED};
use crate::models::{
    Consultation, CreateConsultationRequest, CreateLabResult, CreateTestRequest, LabResult,
    NewTestRequest, RequestFlow, TestRequest, User,
};
use crate::validation::{validate_consultation, validate_lab_result, validate_test_request};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Status transition table.
///
/// Returns the target status for `event` applied in `current`, or `None` when the
/// event is not allowed from `current`. Every pair is matched explicitly so a new
/// status or event fails to compile until it is placed in the table.
pub fn determine_target_state(
    current: RequestStatus,
    event: &RequestEvent,
) -> Option<RequestStatus> {
    use RequestEvent as E;
    use RequestStatus as S;

    match (current, event) {
        (S::Initiated, E::AssignForLabTest) => Some(S::LabTestInProgress),
        (S::LabTestInProgress, E::UpdateLabTest(_)) => Some(S::LabTestCompleted),
        (S::LabTestCompleted, E::AssignForConsultation) => Some(S::DiagnosisInProcess),
        (S::DiagnosisInProcess, E::UpdateConsultation(_)) => Some(S::Completed),

        (
            S::LabTestInProgress | S::LabTestCompleted | S::DiagnosisInProcess | S::Completed,
            E::AssignForLabTest,
        )
        | (
            S::Initiated | S::LabTestCompleted | S::DiagnosisInProcess | S::Completed,
            E::UpdateLabTest(_),
        )
        | (
            S::Initiated | S::LabTestInProgress | S::DiagnosisInProcess | S::Completed,
            E::AssignForConsultation,
        )
        | (
            S::Initiated | S::LabTestInProgress | S::LabTestCompleted | S::Completed,
            E::UpdateConsultation(_),
        ) => None,
    }
}

/// Lab test and consultation workflow over a [`TestRequestStore`].
///
/// Each transition reads the current status, checks it against the transition
/// table, and commits the new status, sub-record and flow entry through a single
/// `save_transition` call guarded by the status it read. Lifecycle actions run
/// only after the commit.
pub struct TestRequestWorkflow {
    store: Arc<dyn TestRequestStore>,
    actions: Vec<Box<dyn StateAction>>,
}

impl TestRequestWorkflow {
    pub fn new(store: Arc<dyn TestRequestStore>, event_publisher: EventPublisher) -> Self {
        Self {
            store,
            actions: vec![
                Box::new(PublishTransitionEventAction::new(event_publisher)),
                Box::new(LogTransitionAction),
            ],
        }
    }

    /// `INITIATED` → `LAB_TEST_IN_PROGRESS`, attaching an empty lab result owned by `tester`.
    pub async fn assign_for_lab_test(
        &self,
        request_id: i64,
        tester: &User,
    ) -> WorkflowResult<TestRequest> {
        self.transition(request_id, RequestEvent::AssignForLabTest, tester)
            .await
    }

    /// `LAB_TEST_IN_PROGRESS` → `LAB_TEST_COMPLETED`, recording vitals and outcome.
    pub async fn update_lab_test(
        &self,
        request_id: i64,
        input: CreateLabResult,
        tester: &User,
    ) -> WorkflowResult<TestRequest> {
        self.transition(request_id, RequestEvent::UpdateLabTest(input), tester)
            .await
    }

    /// `LAB_TEST_COMPLETED` → `DIAGNOSIS_IN_PROCESS`, attaching an empty consultation owned by `doctor`.
    pub async fn assign_for_consultation(
        &self,
        request_id: i64,
        doctor: &User,
    ) -> WorkflowResult<TestRequest> {
        self.transition(request_id, RequestEvent::AssignForConsultation, doctor)
            .await
    }

    /// `DIAGNOSIS_IN_PROCESS` → `COMPLETED`, recording the doctor's suggestion.
    pub async fn update_consultation(
        &self,
        request_id: i64,
        input: CreateConsultationRequest,
        doctor: &User,
    ) -> WorkflowResult<TestRequest> {
        self.transition(request_id, RequestEvent::UpdateConsultation(input), doctor)
            .await
    }

    /// Apply `event` to the request as `actor`.
    ///
    /// Payload validation happens before the request is loaded.
    pub async fn transition(
        &self,
        request_id: i64,
        event: RequestEvent,
        actor: &User,
    ) -> WorkflowResult<TestRequest> {
        let operation = event.operation();
        debug!(
            request_id = request_id,
            operation = %operation,
            actor_id = actor.id,
            "Attempting request transition"
        );

        validate_event(&event)?;

        let request = self
            .store
            .find_by_id(request_id)
            .await?
            .ok_or(WorkflowError::NotFound { request_id })?;

        let current = request.status;
        let target = determine_target_state(current, &event).ok_or(WorkflowError::InvalidState {
            request_id,
            operation,
            current,
            expected: operation.required_status(),
        })?;

        let updated = apply_event(request, target, event, actor, Utc::now().date_naive());
        let flow = RequestFlow::new(request_id, Some(current), target, actor.clone());

        let saved = self
            .store
            .save_transition(&updated, current, flow)
            .await
            .map_err(|err| match err {
                PersistenceError::ConcurrentModification { actual, .. } => {
                    WorkflowError::InvalidState {
                        request_id,
                        operation,
                        current: actual,
                        expected: current,
                    }
                }
                other => WorkflowError::Persistence(other),
            })?;

        info!(
            request_id = request_id,
            operation = %operation,
            from_status = %current,
            to_status = %target,
            actor_id = actor.id,
            "Request transition committed"
        );

        self.execute_actions(CommittedTransition {
            request: &saved,
            from_status: Some(current),
            to_status: target,
            actor,
            event_name: operation.lifecycle_event_name(),
        })
        .await;

        Ok(saved)
    }

    /// Open a new request for `user`.
    pub async fn create_test_request(
        &self,
        input: CreateTestRequest,
        user: &User,
    ) -> WorkflowResult<TestRequest> {
        validate_test_request(&input)?;

        let duplicates = self
            .store
            .find_active_by_email_or_phone(&input.email, &input.phone_number)
            .await?;
        if !duplicates.is_empty() {
            debug!(
                user_id = user.id,
                existing = duplicates.len(),
                "Rejected duplicate test request"
            );
            return Err(WorkflowError::DuplicateRequest);
        }

        let new_request = NewTestRequest::from_input(input, user.clone(), Utc::now().date_naive());
        let saved = self.store.insert(new_request).await?;

        info!(
            request_id = saved.request_id,
            user_id = user.id,
            "Test request created"
        );

        self.execute_actions(CommittedTransition {
            request: &saved,
            from_status: None,
            to_status: saved.status,
            actor: user,
            event_name: REQUEST_CREATED,
        })
        .await;

        Ok(saved)
    }

    /// Requests waiting for a lab tester.
    pub async fn pending_lab_tests(&self) -> WorkflowResult<Vec<TestRequest>> {
        Ok(self.store.find_by_status(RequestStatus::Initiated).await?)
    }

    pub async fn assigned_to_tester(&self, tester: &User) -> WorkflowResult<Vec<TestRequest>> {
        Ok(self.store.find_by_tester(tester.id).await?)
    }

    /// Requests waiting for a doctor.
    pub async fn pending_consultations(&self) -> WorkflowResult<Vec<TestRequest>> {
        Ok(self
            .store
            .find_by_status(RequestStatus::LabTestCompleted)
            .await?)
    }

    pub async fn assigned_to_doctor(&self, doctor: &User) -> WorkflowResult<Vec<TestRequest>> {
        Ok(self.store.find_by_doctor(doctor.id).await?)
    }

    pub async fn requests_created_by(&self, user: &User) -> WorkflowResult<Vec<TestRequest>> {
        Ok(self.store.find_by_created_by(user.id).await?)
    }

    pub async fn flow_history(&self, request_id: i64) -> WorkflowResult<Vec<RequestFlow>> {
        if self.store.find_by_id(request_id).await?.is_none() {
            return Err(WorkflowError::NotFound { request_id });
        }
        Ok(self.store.flow_history(request_id).await?)
    }

    async fn execute_actions(&self, transition: CommittedTransition<'_>) {
        for action in &self.actions {
            if let Err(err) = action.execute(transition).await {
                warn!(
                    request_id = transition.request.request_id,
                    action = action.description(),
                    error = %err,
                    "Post-commit action failed"
                );
            }
        }
    }
}

fn validate_event(event: &RequestEvent) -> WorkflowResult<()> {
    match event {
        RequestEvent::UpdateLabTest(input) => validate_lab_result(input)?,
        RequestEvent::UpdateConsultation(input) => validate_consultation(input)?,
        RequestEvent::AssignForLabTest | RequestEvent::AssignForConsultation => {}
    }
    Ok(())
}

/// Produce the post-transition request. Touches only the sub-record owned by `event`.
fn apply_event(
    mut request: TestRequest,
    target: RequestStatus,
    event: RequestEvent,
    actor: &User,
    today: NaiveDate,
) -> TestRequest {
    match event {
        RequestEvent::AssignForLabTest => {
            request.lab_result = Some(LabResult::assigned_to(actor.clone()));
        }
        RequestEvent::UpdateLabTest(input) => {
            let lab_result = request
                .lab_result
                .get_or_insert_with(|| LabResult::assigned_to(actor.clone()));
            lab_result.tester = actor.clone();
            lab_result.blood_pressure = input.blood_pressure;
            lab_result.heart_beat = input.heart_beat;
            lab_result.temperature = input.temperature;
            lab_result.oxygen_level = input.oxygen_level;
            lab_result.comments = input.comments;
            lab_result.result = input.result;
            lab_result.updated_on = Some(today);
        }
        RequestEvent::AssignForConsultation => {
            request.consultation = Some(Consultation::assigned_to(actor.clone()));
        }
        RequestEvent::UpdateConsultation(input) => {
            let consultation = request
                .consultation
                .get_or_insert_with(|| Consultation::assigned_to(actor.clone()));
            consultation.doctor = actor.clone();
            consultation.suggestion = input.suggestion;
            consultation.comments = input.comments;
            consultation.updated_on = Some(today);
        }
    }
    request.status = target;
    request
}
