//! Request lifecycle controller.
//!
//! Every state change is validated against the state machine before any
//! write, then committed as a conditional write on the expected status and
//! version together with exactly one mailbox entry for the customer. Change
//! events are published only after the write has committed.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};

use wasil_core::config::LifecycleConfig;
use wasil_core::traits::EventPublisher;
use wasil_core::types::{DependantId, Money, RequestId};
use wasil_core::{AppError, AppResult};
use wasil_database::RequestStore;
use wasil_entity::catalog::ServiceId;
use wasil_entity::request::{RequestStatus, ServiceRequest};
use wasil_entity::user::UserRole;

use super::events::{Change, publish};
use super::messages;
use crate::assignment::AssignmentPolicy;
use crate::catalog::CatalogService;
use crate::context::RequestContext;
use crate::dependant::DependantService;
use crate::directory::DispatcherDirectory;
use crate::reassurance::ReassuranceService;

/// Reason stored when operations cancel through a status change.
pub const DEFAULT_OPERATIONS_REASON: &str = "Cancelled by operations";

const MAX_TITLE_LENGTH: usize = 120;

/// Data the customer submits to order a service.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequestInput {
    pub dependant_id: DependantId,
    pub service_id: ServiceId,
    #[serde(default)]
    pub urgent_notes: String,
    /// Price shown to the customer; must match the current quote.
    pub price: Money,
    /// Title for the custom-request offering.
    pub custom_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RequestLifecycle {
    requests: Arc<dyn RequestStore>,
    catalog: Arc<CatalogService>,
    dependants: DependantService,
    directory: DispatcherDirectory,
    policy: Arc<dyn AssignmentPolicy>,
    reassurance: ReassuranceService,
    events: Arc<dyn EventPublisher>,
    config: LifecycleConfig,
}

impl RequestLifecycle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        requests: Arc<dyn RequestStore>,
        catalog: Arc<CatalogService>,
        dependants: DependantService,
        directory: DispatcherDirectory,
        policy: Arc<dyn AssignmentPolicy>,
        reassurance: ReassuranceService,
        events: Arc<dyn EventPublisher>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            requests,
            catalog,
            dependants,
            directory,
            policy,
            reassurance,
            events,
            config,
        }
    }

    /// Create a request and assign it in the same call.
    ///
    /// The record is persisted already `ASSIGNED`, together with the
    /// "Dispatched" notification. Nothing is written when no dispatcher
    /// is available.
    pub async fn create(&self, ctx: &RequestContext, input: CreateRequestInput) -> AppResult<ServiceRequest> {
        ctx.require_role(UserRole::Customer)?;

        let dependant = self.dependants.owned(ctx, input.dependant_id).await?;
        let offering = self.catalog.get(&input.service_id)?;

        let notes = input.urgent_notes.trim().to_string();
        if notes.chars().count() > self.config.max_notes_length {
            return Err(AppError::validation(format!(
                "Notes must be at most {} characters",
                self.config.max_notes_length
            )));
        }

        let title = if offering.is_custom() {
            let title = input.custom_title.as_deref().map(str::trim).unwrap_or_default();
            if title.is_empty() {
                return Err(AppError::validation("A title is required for custom requests"));
            }
            if title.chars().count() > MAX_TITLE_LENGTH {
                return Err(AppError::validation("Title is too long"));
            }
            title.to_string()
        } else {
            offering.title.clone()
        };

        let quote = self.catalog.quote(offering);
        if input.price != quote {
            return Err(AppError::validation(format!(
                "Quoted price {} is out of date; current price is {quote}",
                input.price
            )));
        }

        let now = Utc::now();
        let mut request = ServiceRequest {
            id: RequestId::new(),
            customer_id: ctx.user_id,
            dependant_id: dependant.id,
            parent_name: dependant.name.clone(),
            location: dependant.location,
            service_id: offering.id.clone(),
            title,
            category: offering.category,
            urgent_notes: notes,
            price: quote,
            payout: offering.base_price,
            status: RequestStatus::Requested,
            assigned_dispatcher_id: None,
            cancellation_reason: None,
            ai_reassurance: None,
            is_custom: offering.is_custom(),
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let active = self.directory.list_active().await?;
        let dispatcher = self
            .policy
            .pick(&request, &active)
            .and_then(|id| active.iter().find(|d| d.id == id))
            .ok_or_else(|| {
                warn!(customer_id = %ctx.user_id, service_id = %request.service_id, "No dispatcher available");
                AppError::service_unavailable("No dispatcher is available right now")
            })?;
        request.assign(dispatcher.id, now)?;

        let notification = messages::dispatched(&request, &dispatcher.name, now);
        if let Err(e) = self.requests.insert(&request, &notification).await {
            error!(customer_id = %ctx.user_id, error = %e, "Failed to persist new request");
            return Err(e);
        }

        info!(
            request_id = %request.id,
            customer_id = %request.customer_id,
            dispatcher_id = %dispatcher.id,
            status = %request.status,
            policy = self.policy.name(),
            "Request created"
        );
        publish(self.events.as_ref(), ctx.user_id, &request, &notification, Change::Created).await;
        Ok(request)
    }

    /// Move a request to its next status.
    ///
    /// Only the assigned dispatcher or an administrator may do this. An
    /// administrator targeting `CANCELLED` cancels with the default
    /// operations reason.
    pub async fn advance(&self, ctx: &RequestContext, id: RequestId, to: RequestStatus) -> AppResult<ServiceRequest> {
        if to == RequestStatus::Cancelled {
            if !ctx.is_admin() {
                return Err(AppError::forbidden("Only operations can cancel through a status change"));
            }
            let request = self.load(id).await?;
            return self.cancel_loaded(ctx, request, DEFAULT_OPERATIONS_REASON.to_string()).await;
        }

        let mut request = self.load(id).await?;
        self.authorize_advance(ctx, &request)?;

        let from = request.status;
        let now = Utc::now();
        request.advance(to, now)?;

        if to == RequestStatus::InProgress {
            request.ai_reassurance = Some(self.reassurance.compose(&request).await);
        }

        let notification = messages::status_changed(&request, &ctx.name, now);
        let committed = self.commit(&request, from, &notification).await?;

        info!(
            request_id = %committed.id,
            customer_id = %committed.customer_id,
            dispatcher_id = ?committed.assigned_dispatcher_id.map(|d| d.to_string()),
            from = %from,
            status = %committed.status,
            actor_id = %ctx.user_id,
            "Request status changed"
        );
        publish(
            self.events.as_ref(),
            ctx.user_id,
            &committed,
            &notification,
            Change::StatusChanged { from },
        )
        .await;
        Ok(committed)
    }

    /// Cancel a request. Allowed for the owner and administrators.
    pub async fn cancel(&self, ctx: &RequestContext, id: RequestId, reason: &str) -> AppResult<ServiceRequest> {
        let request = self.load(id).await?;
        if !(request.is_owned_by(ctx.user_id) || ctx.is_admin()) {
            return Err(AppError::forbidden("Only the owner can cancel this request"));
        }
        self.cancel_loaded(ctx, request, reason.to_string()).await
    }

    async fn cancel_loaded(
        &self,
        ctx: &RequestContext,
        mut request: ServiceRequest,
        reason: String,
    ) -> AppResult<ServiceRequest> {
        let reason = reason.trim().to_string();
        if reason.is_empty() {
            return Err(AppError::validation("A cancellation reason is required"));
        }
        if reason.chars().count() > self.config.max_reason_length {
            return Err(AppError::validation(format!(
                "Reason must be at most {} characters",
                self.config.max_reason_length
            )));
        }

        let from = request.status;
        let now = Utc::now();
        let fee = self.config.cancellation_fee_percent;
        request.cancel(reason, fee, now)?;

        let notification = messages::cancelled(&request, fee, now);
        let committed = self.commit(&request, from, &notification).await?;

        info!(
            request_id = %committed.id,
            customer_id = %committed.customer_id,
            from = %from,
            status = %committed.status,
            price = %committed.price,
            actor_id = %ctx.user_id,
            "Request cancelled"
        );
        let reason = committed.cancellation_reason.clone().unwrap_or_default();
        publish(
            self.events.as_ref(),
            ctx.user_id,
            &committed,
            &notification,
            Change::Cancelled { reason: &reason },
        )
        .await;
        Ok(committed)
    }

    /// A request visible to the caller: the owner, the assigned dispatcher,
    /// or an administrator. Anyone else gets `NotFound`.
    pub async fn get(&self, ctx: &RequestContext, id: RequestId) -> AppResult<ServiceRequest> {
        let request = self.load(id).await?;
        if request.is_owned_by(ctx.user_id) || request.is_assigned_to(ctx.user_id) || ctx.is_admin() {
            Ok(request)
        } else {
            Err(not_found(id))
        }
    }

    /// The caller's own requests, newest first.
    pub async fn list_for_customer(&self, ctx: &RequestContext) -> AppResult<Vec<ServiceRequest>> {
        self.requests.list_by_customer(ctx.user_id).await
    }

    /// Requests assigned to the calling dispatcher, newest first.
    pub async fn queue_for_dispatcher(&self, ctx: &RequestContext) -> AppResult<Vec<ServiceRequest>> {
        ctx.require_role(UserRole::Dispatcher)?;
        self.requests.list_by_dispatcher(ctx.user_id).await
    }

    fn authorize_advance(&self, ctx: &RequestContext, request: &ServiceRequest) -> AppResult<()> {
        match ctx.role {
            UserRole::Admin => Ok(()),
            UserRole::Dispatcher if request.is_assigned_to(ctx.user_id) => Ok(()),
            UserRole::Dispatcher => Err(AppError::forbidden("Request is assigned to another dispatcher")),
            UserRole::Customer => Err(AppError::forbidden("Customers cannot change request status")),
        }
    }

    async fn load(&self, id: RequestId) -> AppResult<ServiceRequest> {
        self.requests.find(id).await?.ok_or_else(|| not_found(id))
    }

    async fn commit(
        &self,
        request: &ServiceRequest,
        expected: RequestStatus,
        notification: &wasil_entity::notification::Notification,
    ) -> AppResult<ServiceRequest> {
        self.requests
            .apply_transition(request, expected, notification)
            .await
            .inspect_err(|e| {
                warn!(request_id = %request.id, expected = %expected, error = %e, "Conditional write rejected");
            })
    }
}

fn not_found(id: RequestId) -> AppError {
    AppError::not_found(format!("Request {id} not found"))
}
