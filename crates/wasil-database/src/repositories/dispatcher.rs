//! Dispatcher directory repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use wasil_core::AppResult;
use wasil_core::types::UserId;
use wasil_entity::catalog::ServiceId;
use wasil_entity::dispatcher::Dispatcher;

use super::persistence;
use crate::store::DispatcherStore;

#[derive(Debug, FromRow)]
struct DispatcherRow {
    id: UserId,
    name: String,
    role_title: String,
    rating: f32,
    certifications: Vec<String>,
    photo_url: Option<String>,
    field_photo_url: Option<String>,
    working_video_url: Option<String>,
    supported_service_ids: Vec<String>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<DispatcherRow> for Dispatcher {
    fn from(row: DispatcherRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            role_title: row.role_title,
            rating: row.rating,
            certifications: row.certifications,
            photo_url: row.photo_url,
            field_photo_url: row.field_photo_url,
            working_video_url: row.working_video_url,
            supported_service_ids: row
                .supported_service_ids
                .into_iter()
                .map(ServiceId::new)
                .collect(),
            active: row.active,
            created_at: row.created_at,
        }
    }
}

/// Repository for `dispatchers`.
#[derive(Debug, Clone)]
pub struct DispatcherRepository {
    pool: PgPool,
}

impl DispatcherRepository {
    /// Create a new dispatcher repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DispatcherStore for DispatcherRepository {
    async fn upsert(&self, dispatcher: &Dispatcher) -> AppResult<()> {
        let services: Vec<&str> = dispatcher
            .supported_service_ids
            .iter()
            .map(ServiceId::as_str)
            .collect();

        sqlx::query(
            "INSERT INTO dispatchers (id, name, role_title, rating, certifications, photo_url, \
             field_photo_url, working_video_url, supported_service_ids, active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, role_title = EXCLUDED.role_title, \
             rating = EXCLUDED.rating, certifications = EXCLUDED.certifications, \
             photo_url = EXCLUDED.photo_url, field_photo_url = EXCLUDED.field_photo_url, \
             working_video_url = EXCLUDED.working_video_url, \
             supported_service_ids = EXCLUDED.supported_service_ids, active = EXCLUDED.active",
        )
        .bind(dispatcher.id)
        .bind(&dispatcher.name)
        .bind(&dispatcher.role_title)
        .bind(dispatcher.rating)
        .bind(&dispatcher.certifications)
        .bind(&dispatcher.photo_url)
        .bind(&dispatcher.field_photo_url)
        .bind(&dispatcher.working_video_url)
        .bind(&services)
        .bind(dispatcher.active)
        .bind(dispatcher.created_at)
        .execute(&self.pool)
        .await
        .map_err(persistence("Failed to save dispatcher"))?;
        Ok(())
    }

    async fn find(&self, id: UserId) -> AppResult<Option<Dispatcher>> {
        let row = sqlx::query_as::<_, DispatcherRow>("SELECT * FROM dispatchers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence("Failed to find dispatcher"))?;
        Ok(row.map(Dispatcher::from))
    }

    async fn list(&self) -> AppResult<Vec<Dispatcher>> {
        let rows = sqlx::query_as::<_, DispatcherRow>("SELECT * FROM dispatchers ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(persistence("Failed to list dispatchers"))?;
        Ok(rows.into_iter().map(Dispatcher::from).collect())
    }
}
