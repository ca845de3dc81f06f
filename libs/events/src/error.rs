//! Error types for event handling.

use thiserror::Error;

/// Errors that can occur when emitting events.
#[derive(Debug, Error, Clone)]
pub enum EventError {
    /// A subscriber rejected the event.
    #[error("subscriber rejected event '{event}': {message}")]
    Subscriber { event: &'static str, message: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        EventError::Serialization(err.to_string())
    }
}
