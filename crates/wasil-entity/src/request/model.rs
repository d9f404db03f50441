//! Service request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wasil_core::types::{DependantId, Money, RequestId, UserId};
use wasil_core::{AppError, AppResult};

use super::status::RequestStatus;
use crate::catalog::{Category, ServiceId};
use crate::dependant::Location;

/// A customer's order for a service performed for one of their dependants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Unique request identifier.
    pub id: RequestId,
    /// Owning customer.
    pub customer_id: UserId,
    /// Dependant the service is for.
    pub dependant_id: DependantId,
    /// Dependant display name at creation time.
    pub parent_name: String,
    /// Service area of the dependant.
    pub location: Location,
    /// Catalog slug.
    pub service_id: ServiceId,
    /// Title (catalog title or the customer's own for custom requests).
    pub title: String,
    /// Catalog category.
    pub category: Category,
    /// Free-text notes from the customer.
    pub urgent_notes: String,
    /// Price charged to the customer.
    pub price: Money,
    /// Amount paid to the dispatcher.
    pub payout: Money,
    /// Current status.
    pub status: RequestStatus,
    /// Assigned dispatcher; set once, never cleared.
    pub assigned_dispatcher_id: Option<UserId>,
    /// Reason given on cancellation.
    pub cancellation_reason: Option<String>,
    /// Reassurance text generated when work starts.
    pub ai_reassurance: Option<String>,
    /// Whether the request came from the custom-request offering.
    pub is_custom: bool,
    /// Write counter used for conditional updates.
    pub version: i64,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request was last changed.
    pub updated_at: DateTime<Utc>,
}

impl ServiceRequest {
    /// Whether `user` is the assigned dispatcher.
    pub fn is_assigned_to(&self, user: UserId) -> bool {
        self.assigned_dispatcher_id == Some(user)
    }

    /// Whether `user` owns this request.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.customer_id == user
    }

    /// Record the assigned dispatcher and move to `ASSIGNED`.
    pub fn assign(&mut self, dispatcher: UserId, now: DateTime<Utc>) -> AppResult<()> {
        if self.assigned_dispatcher_id.is_some() {
            return Err(AppError::invalid_transition(format!(
                "Request {} already has a dispatcher",
                self.id
            )));
        }
        self.transition(RequestStatus::Assigned, now)?;
        self.assigned_dispatcher_id = Some(dispatcher);
        Ok(())
    }

    /// Move along a forward edge of the state machine.
    pub fn advance(&mut self, to: RequestStatus, now: DateTime<Utc>) -> AppResult<()> {
        if to == RequestStatus::Cancelled {
            return Err(AppError::invalid_transition(
                "Cancellation goes through cancel()",
            ));
        }
        self.transition(to, now)
    }

    /// Cancel the request, keeping `fee_percent`% of the price.
    pub fn cancel(&mut self, reason: String, fee_percent: u32, now: DateTime<Utc>) -> AppResult<()> {
        self.transition(RequestStatus::Cancelled, now)?;
        self.price = self.price.percent(fee_percent);
        self.cancellation_reason = Some(reason);
        Ok(())
    }

    fn transition(&mut self, to: RequestStatus, now: DateTime<Utc>) -> AppResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(AppError::invalid_transition(format!(
                "Cannot move request {} from {} to {}",
                self.id, self.status, to
            )));
        }
        self.status = to;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ServiceRequest {
        let now = Utc::now();
        ServiceRequest {
            id: RequestId::new(),
            customer_id: UserId::new(),
            dependant_id: DependantId::new(),
            parent_name: "Nadia".into(),
            location: Location::Byblos,
            service_id: ServiceId::new("wifi-fix"),
            title: "Wi-Fi Troubleshooting".into(),
            category: Category::ItTech,
            urgent_notes: String::new(),
            price: Money::from_dollars(100),
            payout: Money::from_dollars(80),
            status: RequestStatus::Requested,
            assigned_dispatcher_id: None,
            cancellation_reason: None,
            ai_reassurance: None,
            is_custom: false,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_assign_sets_dispatcher_once() {
        let mut req = sample();
        let dispatcher = UserId::new();
        req.assign(dispatcher, Utc::now()).unwrap();
        assert_eq!(req.status, RequestStatus::Assigned);
        assert!(req.is_assigned_to(dispatcher));
        assert!(req.assign(UserId::new(), Utc::now()).is_err());
        assert!(req.is_assigned_to(dispatcher));
    }

    #[test]
    fn test_cancel_halves_price_once() {
        let mut req = sample();
        req.cancel("Change of plans".into(), 50, Utc::now()).unwrap();
        assert_eq!(req.price, Money::from_cents(5000));
        let err = req.cancel("again".into(), 50, Utc::now()).unwrap_err();
        assert!(err.is(wasil_core::error::ErrorKind::InvalidTransition));
        assert_eq!(req.price, Money::from_cents(5000));
        assert_eq!(req.cancellation_reason.as_deref(), Some("Change of plans"));
    }

    #[test]
    fn test_completed_cannot_go_back() {
        let mut req = sample();
        req.status = RequestStatus::Completed;
        let before = req.clone();
        assert!(req.advance(RequestStatus::InProgress, Utc::now()).is_err());
        assert_eq!(req, before);
    }
}
