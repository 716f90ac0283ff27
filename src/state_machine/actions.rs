use super::states::RequestStatus;
use crate::events::EventPublisher;
use crate::logging::log_request_operation;
use crate::models::{TestRequest, User};
use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Event publishing failed: {event_name}")]
    EventPublishFailed { event_name: String },
}

/// A committed transition, as seen by post-commit actions.
#[derive(Debug, Clone, Copy)]
pub struct CommittedTransition<'a> {
    pub request: &'a TestRequest,
    pub from_status: Option<RequestStatus>,
    pub to_status: RequestStatus,
    pub actor: &'a User,
    pub event_name: &'static str,
}

/// Side effects run after a transition has been committed.
///
/// Actions cannot roll a transition back; the workflow logs their failures.
#[async_trait]
pub trait StateAction: Send + Sync {
    async fn execute(&self, transition: CommittedTransition<'_>) -> Result<(), ActionError>;

    /// Get a description of this action for logging
    fn description(&self) -> &'static str;
}

/// Action to publish lifecycle events when state transitions occur
pub struct PublishTransitionEventAction {
    event_publisher: EventPublisher,
}

impl PublishTransitionEventAction {
    pub fn new(event_publisher: EventPublisher) -> Self {
        Self { event_publisher }
    }
}

#[async_trait]
impl StateAction for PublishTransitionEventAction {
    async fn execute(&self, transition: CommittedTransition<'_>) -> Result<(), ActionError> {
        let context = build_transition_event_context(&transition);
        self.event_publisher
            .publish(transition.event_name, context)
            .await
            .map_err(|_| ActionError::EventPublishFailed {
                event_name: transition.event_name.to_string(),
            })?;
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Publish lifecycle event for request transition"
    }
}

/// Action to record the transition in the structured operation log
pub struct LogTransitionAction;

#[async_trait]
impl StateAction for LogTransitionAction {
    async fn execute(&self, transition: CommittedTransition<'_>) -> Result<(), ActionError> {
        log_request_operation(
            transition.event_name,
            Some(transition.request.request_id),
            Some(&transition.actor.user_name),
            &transition.to_status.to_string(),
            transition
                .from_status
                .map(|from| format!("from {from}"))
                .as_deref(),
        );
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Log request transition"
    }
}

fn build_transition_event_context(transition: &CommittedTransition<'_>) -> Value {
    json!({
        "request_id": transition.request.request_id,
        "from_status": transition.from_status,
        "to_status": transition.to_status,
        "actor_id": transition.actor.id,
        "actor_user_name": transition.actor.user_name,
    })
}
