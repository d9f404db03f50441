//! Service request repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use wasil_core::types::{DependantId, Money, RequestId, UserId};
use wasil_core::{AppError, AppResult};
use wasil_entity::catalog::ServiceId;
use wasil_entity::notification::Notification;
use wasil_entity::request::{RequestStatus, ServiceRequest};

use super::notification::insert_notification;
use super::persistence;
use crate::store::RequestStore;

const SELECT_COLUMNS: &str = "SELECT id, customer_id, dependant_id, parent_name, location, service_id, \
     title, category, urgent_notes, price_cents, payout_cents, status, assigned_dispatcher_id, \
     cancellation_reason, ai_reassurance, is_custom, version, created_at, updated_at \
     FROM service_requests";

#[derive(Debug, FromRow)]
struct RequestRow {
    id: RequestId,
    customer_id: UserId,
    dependant_id: DependantId,
    parent_name: String,
    location: String,
    service_id: String,
    title: String,
    category: String,
    urgent_notes: String,
    price_cents: i64,
    payout_cents: i64,
    status: String,
    assigned_dispatcher_id: Option<UserId>,
    cancellation_reason: Option<String>,
    ai_reassurance: Option<String>,
    is_custom: bool,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RequestRow> for ServiceRequest {
    type Error = AppError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            customer_id: row.customer_id,
            dependant_id: row.dependant_id,
            parent_name: row.parent_name,
            location: row.location.parse()?,
            service_id: ServiceId::new(row.service_id),
            title: row.title,
            category: row.category.parse()?,
            urgent_notes: row.urgent_notes,
            price: Money::from_cents(row.price_cents),
            payout: Money::from_cents(row.payout_cents),
            status: row.status.parse()?,
            assigned_dispatcher_id: row.assigned_dispatcher_id,
            cancellation_reason: row.cancellation_reason,
            ai_reassurance: row.ai_reassurance,
            is_custom: row.is_custom,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_all(rows: Vec<RequestRow>) -> AppResult<Vec<ServiceRequest>> {
    rows.into_iter().map(ServiceRequest::try_from).collect()
}

/// Repository for `service_requests`.
#[derive(Debug, Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    /// Create a new request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(persistence("Failed to begin transaction"))
    }

    async fn fetch_many(&self, sql: &str, user: Option<UserId>) -> AppResult<Vec<ServiceRequest>> {
        let mut query = sqlx::query_as::<_, RequestRow>(sql);
        if let Some(user) = user {
            query = query.bind(user);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(persistence("Failed to list requests"))?;
        parse_all(rows)
    }
}

#[async_trait]
impl RequestStore for RequestRepository {
    async fn insert(&self, request: &ServiceRequest, notification: &Notification) -> AppResult<()> {
        let mut tx = self.begin().await?;

        sqlx::query(
            "INSERT INTO service_requests (id, customer_id, dependant_id, parent_name, location, \
             service_id, title, category, urgent_notes, price_cents, payout_cents, status, \
             assigned_dispatcher_id, cancellation_reason, ai_reassurance, is_custom, version, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)",
        )
        .bind(request.id)
        .bind(request.customer_id)
        .bind(request.dependant_id)
        .bind(&request.parent_name)
        .bind(request.location.as_str())
        .bind(request.service_id.as_str())
        .bind(&request.title)
        .bind(request.category.as_str())
        .bind(&request.urgent_notes)
        .bind(request.price.cents())
        .bind(request.payout.cents())
        .bind(request.status.as_str())
        .bind(request.assigned_dispatcher_id)
        .bind(&request.cancellation_reason)
        .bind(&request.ai_reassurance)
        .bind(request.is_custom)
        .bind(request.version)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(persistence("Failed to insert request"))?;

        insert_notification(&mut tx, notification).await?;

        tx.commit()
            .await
            .map_err(persistence("Failed to commit request"))
    }

    async fn apply_transition(
        &self,
        request: &ServiceRequest,
        expected_status: RequestStatus,
        notification: &Notification,
    ) -> AppResult<ServiceRequest> {
        let mut tx = self.begin().await?;

        let row = sqlx::query_as::<_, RequestRow>(
            "UPDATE service_requests SET status = $1, price_cents = $2, assigned_dispatcher_id = $3, \
             cancellation_reason = $4, ai_reassurance = $5, updated_at = $6, version = version + 1 \
             WHERE id = $7 AND status = $8 AND version = $9 \
             RETURNING id, customer_id, dependant_id, parent_name, location, service_id, title, \
             category, urgent_notes, price_cents, payout_cents, status, assigned_dispatcher_id, \
             cancellation_reason, ai_reassurance, is_custom, version, created_at, updated_at",
        )
        .bind(request.status.as_str())
        .bind(request.price.cents())
        .bind(request.assigned_dispatcher_id)
        .bind(&request.cancellation_reason)
        .bind(&request.ai_reassurance)
        .bind(request.updated_at)
        .bind(request.id)
        .bind(expected_status.as_str())
        .bind(request.version)
        .fetch_optional(&mut *tx)
        .await
        .map_err(persistence("Failed to update request"))?;

        let Some(row) = row else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM service_requests WHERE id = $1)")
                    .bind(request.id)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(persistence("Failed to check request"))?;
            return Err(if exists {
                AppError::conflict(format!("Request {} was modified concurrently", request.id))
            } else {
                AppError::not_found(format!("Request {} not found", request.id))
            });
        };

        insert_notification(&mut tx, notification).await?;
        tx.commit()
            .await
            .map_err(persistence("Failed to commit transition"))?;

        ServiceRequest::try_from(row)
    }

    async fn find(&self, id: RequestId) -> AppResult<Option<ServiceRequest>> {
        let row = sqlx::query_as::<_, RequestRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence("Failed to find request"))?;
        row.map(ServiceRequest::try_from).transpose()
    }

    async fn list_by_customer(&self, customer: UserId) -> AppResult<Vec<ServiceRequest>> {
        self.fetch_many(
            &format!("{SELECT_COLUMNS} WHERE customer_id = $1 ORDER BY created_at DESC, id DESC"),
            Some(customer),
        )
        .await
    }

    async fn list_by_dispatcher(&self, dispatcher: UserId) -> AppResult<Vec<ServiceRequest>> {
        self.fetch_many(
            &format!(
                "{SELECT_COLUMNS} WHERE assigned_dispatcher_id = $1 ORDER BY created_at DESC, id DESC"
            ),
            Some(dispatcher),
        )
        .await
    }

    async fn list_all(&self) -> AppResult<Vec<ServiceRequest>> {
        self.fetch_many(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"), None)
            .await
    }
}
