//! Notification repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use wasil_core::AppResult;
use wasil_core::types::{NotificationId, RequestId, UserId};
use wasil_entity::notification::Notification;

use super::persistence;
use crate::store::NotificationStore;

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: NotificationId,
    user_id: UserId,
    title: String,
    message: String,
    request_id: Option<RequestId>,
    read: bool,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            message: row.message,
            request_id: row.request_id,
            read: row.read,
            read_at: row.read_at,
            created_at: row.created_at,
        }
    }
}

/// Insert a notification inside an open transaction.
pub(crate) async fn insert_notification(
    tx: &mut Transaction<'static, Postgres>,
    notification: &Notification,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO notifications (id, user_id, title, message, request_id, read, read_at, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(notification.id)
    .bind(notification.user_id)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(notification.request_id)
    .bind(notification.read)
    .bind(notification.read_at)
    .bind(notification.created_at)
    .execute(&mut **tx)
    .await
    .map_err(persistence("Failed to insert notification"))?;
    Ok(())
}

/// Repository for `notifications`.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert(&self, notification: &Notification) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(persistence("Failed to begin transaction"))?;
        insert_notification(&mut tx, notification).await?;
        tx.commit()
            .await
            .map_err(persistence("Failed to commit notification"))
    }

    async fn find(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence("Failed to find notification"))?;
        Ok(row.map(Notification::from))
    }

    async fn list_for_user(&self, user: UserId) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence("Failed to list notifications"))?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn count_unread(&self, user: UserId) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read")
                .bind(user)
                .fetch_one(&self.pool)
                .await
                .map_err(persistence("Failed to count unread notifications"))?;
        Ok(count.max(0) as u64)
    }

    async fn mark_read(&self, id: NotificationId, at: DateTime<Utc>) -> AppResult<Option<Notification>> {
        // COALESCE keeps the first read time on repeated calls.
        let row = sqlx::query_as::<_, NotificationRow>(
            "UPDATE notifications SET read = TRUE, read_at = COALESCE(read_at, $2) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence("Failed to mark notification read"))?;
        Ok(row.map(Notification::from))
    }
}
