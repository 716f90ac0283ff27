pub mod publisher;

pub use publisher::{EventPublisher, PublishError, PublishedEvent};

/// Published when a new request is stored.
pub const REQUEST_CREATED: &str = "test_request.created";
