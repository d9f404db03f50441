//! Global view over every request plus revenue figures.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use wasil_core::AppResult;
use wasil_core::types::{Money, PageRequest, PageResponse};
use wasil_database::{RequestStore, UserStore};
use wasil_entity::request::{RequestStatus, ServiceRequest};
use wasil_entity::user::User;

use crate::context::RequestContext;
use crate::directory::DispatcherDirectory;

/// Dashboard figures.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub total_requests: u64,
    /// Request count per status, including statuses with zero requests.
    pub by_status: BTreeMap<RequestStatus, u64>,
    /// Sum of current prices; cancelled requests count at their reduced price.
    pub gross_revenue: Money,
    /// Payouts of completed requests.
    pub payouts_owed: Money,
    pub active_dispatchers: u64,
    pub registered_users: u64,
}

#[derive(Debug, Clone)]
pub struct AdminService {
    requests: Arc<dyn RequestStore>,
    users: Arc<dyn UserStore>,
    directory: DispatcherDirectory,
}

impl AdminService {
    pub fn new(
        requests: Arc<dyn RequestStore>,
        users: Arc<dyn UserStore>,
        directory: DispatcherDirectory,
    ) -> Self {
        Self {
            requests,
            users,
            directory,
        }
    }

    /// Every request, newest first, optionally filtered by status.
    pub async fn list_requests(
        &self,
        ctx: &RequestContext,
        status: Option<RequestStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ServiceRequest>> {
        ctx.require_admin()?;
        let page = PageRequest::new(page.page, page.page_size);
        let all: Vec<ServiceRequest> = self
            .requests
            .list_all()
            .await?
            .into_iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .collect();
        Ok(PageResponse::from_vec(all, &page))
    }

    pub async fn list_users(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        ctx.require_admin()?;
        self.users.list().await
    }

    pub async fn overview(&self, ctx: &RequestContext) -> AppResult<AdminOverview> {
        ctx.require_admin()?;
        let requests = self.requests.list_all().await?;

        let mut by_status: BTreeMap<RequestStatus, u64> =
            RequestStatus::ALL.iter().map(|s| (*s, 0)).collect();
        let mut gross = 0i64;
        let mut owed = 0i64;
        for request in &requests {
            *by_status.entry(request.status).or_default() += 1;
            gross += request.price.cents();
            if request.status == RequestStatus::Completed {
                owed += request.payout.cents();
            }
        }

        Ok(AdminOverview {
            total_requests: requests.len() as u64,
            by_status,
            gross_revenue: Money::from_cents(gross),
            payouts_owed: Money::from_cents(owed),
            active_dispatchers: self.directory.list_active().await?.len() as u64,
            registered_users: self.users.list().await?.len() as u64,
        })
    }
}
