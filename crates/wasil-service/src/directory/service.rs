//! Dispatcher directory fronted by an in-process cache.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use tracing::info;

use wasil_core::config::DirectoryConfig;
use wasil_core::types::UserId;
use wasil_core::{AppError, AppResult};
use wasil_database::{DispatcherStore, RequestStore, UserStore};
use wasil_entity::dispatcher::{CreateDispatcher, Dispatcher};
use wasil_entity::user::UserRole;

use crate::context::RequestContext;

/// Read-mostly registry of dispatchers.
#[derive(Clone)]
pub struct DispatcherDirectory {
    store: Arc<dyn DispatcherStore>,
    users: Arc<dyn UserStore>,
    requests: Arc<dyn RequestStore>,
    cache: Cache<(), Arc<Vec<Dispatcher>>>,
}

impl std::fmt::Debug for DispatcherDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherDirectory")
            .field("cached_entries", &self.cache.entry_count())
            .finish()
    }
}

impl DispatcherDirectory {
    pub fn new(
        config: &DirectoryConfig,
        store: Arc<dyn DispatcherStore>,
        users: Arc<dyn UserStore>,
        requests: Arc<dyn RequestStore>,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();
        Self {
            store,
            users,
            requests,
            cache,
        }
    }

    /// Every directory entry, cached.
    pub async fn list(&self) -> AppResult<Arc<Vec<Dispatcher>>> {
        let store = self.store.clone();
        self.cache
            .try_get_with((), async move { store.list().await.map(Arc::new) })
            .await
            .map_err(|e: Arc<AppError>| (*e).clone())
    }

    /// Dispatchers currently taking work.
    pub async fn list_active(&self) -> AppResult<Vec<Dispatcher>> {
        Ok(self.list().await?.iter().filter(|d| d.active).cloned().collect())
    }

    /// One directory entry.
    pub async fn get(&self, id: UserId) -> AppResult<Dispatcher> {
        if let Some(found) = self.list().await?.iter().find(|d| d.id == id) {
            return Ok(found.clone());
        }
        self.store
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Dispatcher {id} not found")))
    }

    /// Register or replace a dispatcher. The id must belong to a dispatcher account.
    pub async fn register(&self, ctx: &RequestContext, input: CreateDispatcher) -> AppResult<Dispatcher> {
        ctx.require_admin()?;
        let account = self
            .users
            .find(input.id)
            .await?
            .ok_or_else(|| AppError::validation(format!("No account with id {}", input.id)))?;
        if account.role != UserRole::Dispatcher {
            return Err(AppError::validation(format!(
                "Account {} is not a dispatcher account",
                input.id
            )));
        }
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Dispatcher name is required"));
        }

        let dispatcher = input.into_dispatcher(Utc::now());
        self.save(&dispatcher).await?;
        info!(dispatcher_id = %dispatcher.id, name = %dispatcher.name, "Registered dispatcher");
        Ok(dispatcher)
    }

    /// Toggle whether a dispatcher takes new work.
    pub async fn set_active(&self, ctx: &RequestContext, id: UserId, active: bool) -> AppResult<Dispatcher> {
        ctx.require_admin()?;
        let mut dispatcher = self.get(id).await?;
        dispatcher.active = active;
        self.save(&dispatcher).await?;
        info!(dispatcher_id = %id, active, "Changed dispatcher availability");
        Ok(dispatcher)
    }

    /// Persist an entry and drop the cached list.
    pub async fn save(&self, dispatcher: &Dispatcher) -> AppResult<()> {
        self.store.upsert(dispatcher).await?;
        self.cache.invalidate(&()).await;
        Ok(())
    }

    /// Dispatchers working on the caller's open requests.
    pub async fn active_for_customer(&self, ctx: &RequestContext) -> AppResult<Vec<Dispatcher>> {
        let open: HashSet<UserId> = self
            .requests
            .list_by_customer(ctx.user_id)
            .await?
            .into_iter()
            .filter(|r| !r.status.is_terminal())
            .filter_map(|r| r.assigned_dispatcher_id)
            .collect();

        Ok(self
            .list()
            .await?
            .iter()
            .filter(|d| open.contains(&d.id))
            .cloned()
            .collect())
    }
}
