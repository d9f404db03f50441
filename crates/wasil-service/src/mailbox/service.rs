//! Reading and acknowledging notifications.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use wasil_core::events::{DomainEvent, EventPayload, MailboxEvent};
use wasil_core::traits::EventPublisher;
use wasil_core::types::{NotificationId, PageRequest, PageResponse};
use wasil_core::{AppError, AppResult};
use wasil_database::NotificationStore;
use wasil_entity::notification::Notification;

use crate::context::RequestContext;

/// Mailbox operations. Callers only ever see their own entries.
#[derive(Debug, Clone)]
pub struct MailboxService {
    store: Arc<dyn NotificationStore>,
    events: Arc<dyn EventPublisher>,
}

impl MailboxService {
    pub fn new(store: Arc<dyn NotificationStore>, events: Arc<dyn EventPublisher>) -> Self {
        Self { store, events }
    }

    /// The caller's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let page = PageRequest::new(page.page, page.page_size);
        let all = self.store.list_for_user(ctx.user_id).await?;
        Ok(PageResponse::from_vec(all, &page))
    }

    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.store.count_unread(ctx.user_id).await
    }

    /// Mark one of the caller's notifications read. Repeating the call is a no-op.
    pub async fn mark_read(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<Notification> {
        let existing = self
            .store
            .find(id)
            .await?
            .filter(|n| n.user_id == ctx.user_id)
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;

        if existing.read {
            return Ok(existing);
        }

        let updated = self
            .store
            .mark_read(id, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;

        debug!(notification_id = %id, user_id = %ctx.user_id, "Notification read");
        self.events
            .publish(DomainEvent::new(
                Some(ctx.user_id.into_uuid()),
                EventPayload::Mailbox(MailboxEvent::NotificationRead {
                    notification_id: id.into_uuid(),
                    recipient_id: ctx.user_id.into_uuid(),
                }),
            ))
            .await;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasil_core::error::ErrorKind;
    use wasil_core::traits::NullEventPublisher;
    use wasil_core::types::UserId;
    use wasil_database::Stores;
    use wasil_entity::user::UserRole;

    fn ctx(id: UserId) -> RequestContext {
        RequestContext::new(id, UserRole::Customer, "Maya")
    }

    #[tokio::test]
    async fn test_mark_read_is_scoped_and_idempotent() {
        let stores = Stores::memory();
        let svc = MailboxService::new(stores.notifications.clone(), Arc::new(NullEventPublisher));
        let owner = UserId::new();
        let n = Notification::new(owner, "Dispatched", "On the way", None, Utc::now());
        stores.notifications.insert(&n).await.unwrap();

        assert_eq!(svc.unread_count(&ctx(owner)).await.unwrap(), 1);

        let err = svc.mark_read(&ctx(UserId::new()), n.id).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));

        let first = svc.mark_read(&ctx(owner), n.id).await.unwrap();
        assert!(first.read);
        let second = svc.mark_read(&ctx(owner), n.id).await.unwrap();
        assert_eq!(first.read_at, second.read_at);
        assert_eq!(svc.unread_count(&ctx(owner)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let stores = Stores::memory();
        let svc = MailboxService::new(stores.notifications.clone(), Arc::new(NullEventPublisher));
        let owner = UserId::new();
        let base = Utc::now();
        for i in 0..3 {
            let n = Notification::new(
                owner,
                format!("n{i}"),
                "msg",
                None,
                base + chrono::Duration::seconds(i),
            );
            stores.notifications.insert(&n).await.unwrap();
        }

        let page = svc.list(&ctx(owner), &PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.items[0].title, "n2");
        assert!(page.has_next);
    }
}
