//! Event publication after committed lifecycle writes.

use wasil_core::events::{DomainEvent, EventPayload, MailboxEvent, RequestEvent};
use wasil_core::traits::EventPublisher;
use wasil_core::types::UserId;
use wasil_entity::notification::Notification;
use wasil_entity::request::{RequestStatus, ServiceRequest};

/// What happened to the request.
pub(crate) enum Change<'a> {
    Created,
    StatusChanged { from: RequestStatus },
    Cancelled { reason: &'a str },
}

/// Publish the request change and the mailbox entry written with it.
///
/// Serialization failures are logged; the write has already committed.
pub(crate) async fn publish(
    events: &dyn EventPublisher,
    actor: UserId,
    request: &ServiceRequest,
    notification: &Notification,
    change: Change<'_>,
) {
    let (snapshot, entry) = match (serde_json::to_value(request), serde_json::to_value(notification)) {
        (Ok(s), Ok(e)) => (s, e),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(request_id = %request.id, error = %e, "Failed to serialize change event");
            return;
        }
    };

    let request_id = request.id.into_uuid();
    let customer_id = request.customer_id.into_uuid();
    let dispatcher_id = request.assigned_dispatcher_id.map(UserId::into_uuid);
    let event = match change {
        Change::Created => RequestEvent::Created {
            request_id,
            customer_id,
            dispatcher_id,
            snapshot,
        },
        Change::StatusChanged { from } => RequestEvent::StatusChanged {
            request_id,
            customer_id,
            dispatcher_id,
            from: from.to_string(),
            to: request.status.to_string(),
            snapshot,
        },
        Change::Cancelled { reason } => RequestEvent::Cancelled {
            request_id,
            customer_id,
            dispatcher_id,
            reason: reason.to_string(),
            snapshot,
        },
    };

    let actor = Some(actor.into_uuid());
    events
        .publish(DomainEvent::new(actor, EventPayload::Request(event)))
        .await;
    events
        .publish(DomainEvent::new(
            actor,
            EventPayload::Mailbox(MailboxEvent::NotificationCreated {
                notification_id: notification.id.into_uuid(),
                recipient_id: notification.user_id.into_uuid(),
                snapshot: entry,
            }),
        ))
        .await;
}
