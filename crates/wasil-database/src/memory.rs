//! Process-local store used for development and tests.
//!
//! All records live behind one `RwLock`, so a request and its notification
//! are committed under the same write guard.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;

use wasil_core::types::{DependantId, NotificationId, RequestId, UserId};
use wasil_core::{AppError, AppResult};
use wasil_entity::dependant::Dependant;
use wasil_entity::dispatcher::Dispatcher;
use wasil_entity::notification::Notification;
use wasil_entity::request::{RequestStatus, ServiceRequest};
use wasil_entity::user::User;

use crate::store::{
    DependantStore, DispatcherStore, NotificationStore, RequestStore, UserStore,
    VerificationToken,
};

#[derive(Debug, Default)]
struct State {
    requests: HashMap<RequestId, ServiceRequest>,
    notifications: HashMap<NotificationId, Notification>,
    dependants: HashMap<DependantId, Dependant>,
    dispatchers: HashMap<UserId, Dispatcher>,
    users: HashMap<UserId, User>,
}

/// In-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    verifications: DashMap<String, VerificationToken>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut requests: Vec<ServiceRequest>) -> Vec<ServiceRequest> {
    requests.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
    });
    requests
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn insert(&self, request: &ServiceRequest, notification: &Notification) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.requests.contains_key(&request.id) {
            return Err(AppError::conflict(format!("Request {} already exists", request.id)));
        }
        state.requests.insert(request.id, request.clone());
        state.notifications.insert(notification.id, notification.clone());
        Ok(())
    }

    async fn apply_transition(
        &self,
        request: &ServiceRequest,
        expected_status: RequestStatus,
        notification: &Notification,
    ) -> AppResult<ServiceRequest> {
        let mut state = self.state.write().await;
        let stored = state
            .requests
            .get_mut(&request.id)
            .ok_or_else(|| AppError::not_found(format!("Request {} not found", request.id)))?;

        if stored.status != expected_status || stored.version != request.version {
            return Err(AppError::conflict(format!(
                "Request {} was modified concurrently",
                request.id
            )));
        }

        let mut committed = request.clone();
        committed.version = request.version + 1;
        *stored = committed.clone();
        state.notifications.insert(notification.id, notification.clone());
        Ok(committed)
    }

    async fn find(&self, id: RequestId) -> AppResult<Option<ServiceRequest>> {
        Ok(self.state.read().await.requests.get(&id).cloned())
    }

    async fn list_by_customer(&self, customer: UserId) -> AppResult<Vec<ServiceRequest>> {
        let state = self.state.read().await;
        Ok(newest_first(
            state
                .requests
                .values()
                .filter(|r| r.customer_id == customer)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_dispatcher(&self, dispatcher: UserId) -> AppResult<Vec<ServiceRequest>> {
        let state = self.state.read().await;
        Ok(newest_first(
            state
                .requests
                .values()
                .filter(|r| r.is_assigned_to(dispatcher))
                .cloned()
                .collect(),
        ))
    }

    async fn list_all(&self) -> AppResult<Vec<ServiceRequest>> {
        let state = self.state.read().await;
        Ok(newest_first(state.requests.values().cloned().collect()))
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert(&self, notification: &Notification) -> AppResult<()> {
        self.state
            .write()
            .await
            .notifications
            .insert(notification.id, notification.clone());
        Ok(())
    }

    async fn find(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        Ok(self.state.read().await.notifications.get(&id).cloned())
    }

    async fn list_for_user(&self, user: UserId) -> AppResult<Vec<Notification>> {
        let state = self.state.read().await;
        let mut entries: Vec<Notification> = state
            .notifications
            .values()
            .filter(|n| n.user_id == user)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(entries)
    }

    async fn count_unread(&self, user: UserId) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .values()
            .filter(|n| n.user_id == user && !n.read)
            .count() as u64)
    }

    async fn mark_read(&self, id: NotificationId, at: DateTime<Utc>) -> AppResult<Option<Notification>> {
        let mut state = self.state.write().await;
        Ok(state.notifications.get_mut(&id).map(|n| {
            n.mark_read(at);
            n.clone()
        }))
    }
}

#[async_trait]
impl DependantStore for MemoryStore {
    async fn insert(&self, dependant: &Dependant) -> AppResult<()> {
        self.state
            .write()
            .await
            .dependants
            .insert(dependant.id, dependant.clone());
        Ok(())
    }

    async fn find(&self, id: DependantId) -> AppResult<Option<Dependant>> {
        Ok(self.state.read().await.dependants.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Dependant>> {
        let state = self.state.read().await;
        let mut list: Vec<Dependant> = state
            .dependants
            .values()
            .filter(|d| d.owner_id == owner)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(list)
    }

    async fn update(&self, dependant: &Dependant) -> AppResult<()> {
        let mut state = self.state.write().await;
        match state.dependants.get_mut(&dependant.id) {
            Some(stored) => {
                *stored = dependant.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!(
                "Dependant {} not found",
                dependant.id
            ))),
        }
    }

    async fn delete(&self, id: DependantId) -> AppResult<bool> {
        Ok(self.state.write().await.dependants.remove(&id).is_some())
    }
}

#[async_trait]
impl DispatcherStore for MemoryStore {
    async fn upsert(&self, dispatcher: &Dispatcher) -> AppResult<()> {
        self.state
            .write()
            .await
            .dispatchers
            .insert(dispatcher.id, dispatcher.clone());
        Ok(())
    }

    async fn find(&self, id: UserId) -> AppResult<Option<Dispatcher>> {
        Ok(self.state.read().await.dispatchers.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Dispatcher>> {
        let state = self.state.read().await;
        let mut list: Vec<Dispatcher> = state.dispatchers.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &User) -> AppResult<()> {
        let mut state = self.state.write().await;
        let email = user.email.to_lowercase();
        if state.users.values().any(|u| u.email.to_lowercase() == email) {
            return Err(AppError::conflict("Email is already registered"));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!("User {} not found", user.id))),
        }
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn insert_verification(&self, token: &VerificationToken) -> AppResult<()> {
        self.verifications
            .insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn take_verification(&self, token_hash: &str) -> AppResult<Option<VerificationToken>> {
        Ok(self.verifications.remove(token_hash).map(|(_, token)| token))
    }
}
