//! Store traits consumed by the service layer.
//!
//! Each trait is implemented twice: by the PostgreSQL repositories in
//! [`crate::repositories`] and by [`crate::MemoryStore`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use wasil_core::AppResult;
use wasil_core::config::{DatabaseBackend, DatabaseConfig};
use wasil_core::types::{DependantId, NotificationId, RequestId, UserId};
use wasil_entity::dependant::Dependant;
use wasil_entity::dispatcher::Dispatcher;
use wasil_entity::notification::Notification;
use wasil_entity::request::{RequestStatus, ServiceRequest};
use wasil_entity::user::User;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    DependantRepository, DispatcherRepository, NotificationRepository, RequestRepository,
    UserRepository,
};

/// Persisted service requests.
#[async_trait]
pub trait RequestStore: Send + Sync + std::fmt::Debug {
    /// Insert a new request together with its first notification, atomically.
    async fn insert(&self, request: &ServiceRequest, notification: &Notification) -> AppResult<()>;

    /// Replace a request if it is still at `expected_status` and
    /// `request.version`, writing `notification` in the same unit.
    ///
    /// The stored version is incremented and the committed record returned.
    /// Fails with `NotFound` for an unknown id and `Conflict` when the
    /// stored status or version differs.
    async fn apply_transition(
        &self,
        request: &ServiceRequest,
        expected_status: RequestStatus,
        notification: &Notification,
    ) -> AppResult<ServiceRequest>;

    /// Fetch a request by id.
    async fn find(&self, id: RequestId) -> AppResult<Option<ServiceRequest>>;

    /// Requests owned by a customer, newest first.
    async fn list_by_customer(&self, customer: UserId) -> AppResult<Vec<ServiceRequest>>;

    /// Requests assigned to a dispatcher, newest first.
    async fn list_by_dispatcher(&self, dispatcher: UserId) -> AppResult<Vec<ServiceRequest>>;

    /// Every request, newest first.
    async fn list_all(&self) -> AppResult<Vec<ServiceRequest>>;
}

/// Per-user notification mailboxes.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug {
    /// Append an entry.
    async fn insert(&self, notification: &Notification) -> AppResult<()>;

    /// Fetch one entry.
    async fn find(&self, id: NotificationId) -> AppResult<Option<Notification>>;

    /// Every entry of a mailbox, newest first.
    async fn list_for_user(&self, user: UserId) -> AppResult<Vec<Notification>>;

    /// Number of unread entries.
    async fn count_unread(&self, user: UserId) -> AppResult<u64>;

    /// Set the read flag if it is not set yet and return the stored entry.
    async fn mark_read(&self, id: NotificationId, at: DateTime<Utc>) -> AppResult<Option<Notification>>;
}

/// Dependant profiles.
#[async_trait]
pub trait DependantStore: Send + Sync + std::fmt::Debug {
    async fn insert(&self, dependant: &Dependant) -> AppResult<()>;
    async fn find(&self, id: DependantId) -> AppResult<Option<Dependant>>;
    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Dependant>>;
    async fn update(&self, dependant: &Dependant) -> AppResult<()>;
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: DependantId) -> AppResult<bool>;
}

/// Dispatcher directory.
#[async_trait]
pub trait DispatcherStore: Send + Sync + std::fmt::Debug {
    /// Insert or replace a directory entry.
    async fn upsert(&self, dispatcher: &Dispatcher) -> AppResult<()>;
    async fn find(&self, id: UserId) -> AppResult<Option<Dispatcher>>;
    /// All entries ordered by name.
    async fn list(&self) -> AppResult<Vec<Dispatcher>>;
}

/// A pending email verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    /// SHA-256 hash of the token sent to the user.
    pub token_hash: String,
    /// Account being verified.
    pub user_id: UserId,
    /// Expiry.
    pub expires_at: DateTime<Utc>,
}

/// Accounts and email verification tokens.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Insert an account. `Conflict` when the email is taken.
    async fn insert(&self, user: &User) -> AppResult<()>;
    async fn find(&self, id: UserId) -> AppResult<Option<User>>;
    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn update(&self, user: &User) -> AppResult<()>;
    async fn list(&self) -> AppResult<Vec<User>>;

    async fn insert_verification(&self, token: &VerificationToken) -> AppResult<()>;
    /// Remove and return the token with this hash.
    async fn take_verification(&self, token_hash: &str) -> AppResult<Option<VerificationToken>>;
}

/// Every store the application needs, behind trait objects.
#[derive(Debug, Clone)]
pub struct Stores {
    pub requests: Arc<dyn RequestStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub dependants: Arc<dyn DependantStore>,
    pub dispatchers: Arc<dyn DispatcherStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    /// Stores backed by one shared [`MemoryStore`].
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            requests: store.clone(),
            notifications: store.clone(),
            dependants: store.clone(),
            dispatchers: store.clone(),
            users: store,
        }
    }

    /// Open the backend named in `config`, running migrations when asked.
    ///
    /// Returns the pool alongside the stores for the PostgreSQL backend.
    pub async fn open(config: &DatabaseConfig) -> AppResult<(Self, Option<DatabasePool>)> {
        match config.backend {
            DatabaseBackend::Memory => {
                info!("Using the in-memory store; data is lost on exit");
                Ok((Self::memory(), None))
            }
            DatabaseBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok((Self::postgres(&pool), Some(pool)))
            }
        }
    }

    /// Stores backed by PostgreSQL.
    pub fn postgres(db: &DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            requests: Arc::new(RequestRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            dependants: Arc::new(DependantRepository::new(pool.clone())),
            dispatchers: Arc::new(DispatcherRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
        }
    }
}
