//! Mailbox texts for lifecycle transitions.

use chrono::{DateTime, Utc};

use wasil_entity::notification::Notification;
use wasil_entity::request::ServiceRequest;

pub(crate) fn dispatched(request: &ServiceRequest, dispatcher_name: &str, now: DateTime<Utc>) -> Notification {
    Notification::new(
        request.customer_id,
        "Dispatched",
        format!(
            "{} for {} assigned to {}.",
            request.title, request.parent_name, dispatcher_name
        ),
        Some(request.id),
        now,
    )
}

pub(crate) fn status_changed(request: &ServiceRequest, actor_name: &str, now: DateTime<Utc>) -> Notification {
    let label = request.status.label();
    Notification::new(
        request.customer_id,
        format!("Mission {label}"),
        format!("{actor_name} has updated your {} request to {label}.", request.title),
        Some(request.id),
        now,
    )
}

pub(crate) fn cancelled(request: &ServiceRequest, fee_percent: u32, now: DateTime<Utc>) -> Notification {
    Notification::new(
        request.customer_id,
        "Request Cancelled",
        format!(
            "{} for {} was cancelled. A {fee_percent}% cancellation fee of {} applies.",
            request.title, request.parent_name, request.price
        ),
        Some(request.id),
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::fixtures;
    use wasil_entity::request::RequestStatus;

    #[test]
    fn test_status_message_uses_label() {
        let mut request = fixtures::request("wifi-fix");
        request.title = "Wi-Fi Troubleshooting".into();
        request.status = RequestStatus::InProgress;
        let n = status_changed(&request, "Rami", Utc::now());
        assert_eq!(n.title, "Mission In Progress");
        assert_eq!(n.message, "Rami has updated your Wi-Fi Troubleshooting request to In Progress.");
        assert_eq!(n.user_id, request.customer_id);
    }
}
