use crate::config::EventConfig;
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Fan-out publisher for request lifecycle events
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
    enabled: bool,
}

/// Event that has been published
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub event_id: Uuid,
    pub name: String,
    pub context: Value,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            enabled: true,
        }
    }

    pub fn from_config(config: &EventConfig) -> Self {
        let mut publisher = Self::new(config.channel_capacity);
        publisher.enabled = config.enabled;
        publisher
    }

    /// Publish an event with the given name and context.
    ///
    /// Having no subscribers is not an error; the event is simply dropped.
    pub async fn publish(
        &self,
        event_name: impl Into<String>,
        context: Value,
    ) -> Result<Option<Uuid>, PublishError> {
        if !self.enabled {
            return Ok(None);
        }
        if !context.is_object() {
            return Err(PublishError::InvalidContext);
        }

        let event = PublishedEvent {
            event_id: Uuid::new_v4(),
            name: event_name.into(),
            context,
            published_at: chrono::Utc::now(),
        };
        let event_id = event.event_id;

        // send() only fails when there are no receivers
        let _ = self.sender.send(event);
        Ok(Some(event_id))
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Error types for event publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Event context must be a JSON object")]
    InvalidContext,
}

impl From<PublishError> for crate::error::UpstacError {
    fn from(err: PublishError) -> Self {
        crate::error::UpstacError::EventError(err.to_string())
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000)
    }
}
