//! Asynchronous subscriber-driven event emission.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use crate::{DeviceEvent, EventError};

/// A subscriber receiving device lifecycle events.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Handle a single event.
    ///
    /// Returning an error fails the emitting operation.
    async fn handle(&self, event: &DeviceEvent) -> Result<(), EventError>;
}

/// Fans events out to registered subscribers.
///
/// Subscribers are invoked sequentially in registration order. The first
/// subscriber error aborts the fan-out and propagates to the emitter's
/// caller; later subscribers are not invoked for that event.
#[derive(Default)]
pub struct Emitter {
    subscribers: RwLock<Vec<Arc<dyn EventSubscriber>>>,
}

impl Emitter {
    /// Create an emitter with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber.
    pub async fn subscribe(&self, subscriber: Arc<dyn EventSubscriber>) {
        self.subscribers.write().await.push(subscriber);
    }

    /// Emit an event to all subscribers.
    pub async fn emit(&self, event: DeviceEvent) -> Result<(), EventError> {
        let subscribers = self.subscribers.read().await.clone();

        trace!(
            event = event.name(),
            subscribers = subscribers.len(),
            "Emitting event"
        );

        for subscriber in subscribers {
            subscriber.handle(&event).await?;
        }

        Ok(())
    }
}
