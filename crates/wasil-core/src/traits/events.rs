//! Event publishing seam between the service layer and the realtime engine.

use async_trait::async_trait;

use crate::events::DomainEvent;

/// Receives committed domain events.
///
/// Publishing is fire-and-forget: implementations must not fail the
/// operation that produced the event, so the method returns nothing.
#[async_trait]
pub trait EventPublisher: Send + Sync + std::fmt::Debug + 'static {
    /// Publish one event.
    async fn publish(&self, event: DomainEvent);
}

/// Publisher that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventPublisher;

#[async_trait]
impl EventPublisher for NullEventPublisher {
    async fn publish(&self, event: DomainEvent) {
        tracing::trace!(event = event.name(), "Dropping event (no publisher)");
    }
}
