//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wasil_core::types::{NotificationId, RequestId, UserId};

/// An entry in a user's mailbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Mailbox owner.
    pub user_id: UserId,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Related request, if any.
    pub request_id: Option<RequestId>,
    /// Whether the entry has been read.
    pub read: bool,
    /// When it was read.
    pub read_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build an unread entry.
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        request_id: Option<RequestId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            title: title.into(),
            message: message.into(),
            request_id,
            read: false,
            read_at: None,
            created_at: now,
        }
    }

    /// Flip the read flag. Returns `false` when it was already read.
    pub fn mark_read(&mut self, now: DateTime<Utc>) -> bool {
        if self.read {
            return false;
        }
        self.read = true;
        self.read_at = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut n = Notification::new(UserId::new(), "Dispatched", "msg", None, Utc::now());
        assert!(n.mark_read(Utc::now()));
        let first = n.read_at;
        assert!(!n.mark_read(Utc::now()));
        assert_eq!(n.read_at, first);
    }
}
