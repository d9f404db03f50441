//! Subscription manager: opens, replaces and tears down live views.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, watch};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use wasil_core::AppResult;
use wasil_core::events::{DomainEvent, EventPayload};
use wasil_database::RequestStore;
use wasil_entity::request::ServiceRequest;

use crate::bridge::MemoryPubSub;

use super::view::{LiveView, ViewKey};

/// Owns the feeding task of every open view.
#[derive(Debug)]
pub struct SubscriptionManager {
    store: Arc<dyn RequestStore>,
    pubsub: Arc<MemoryPubSub>,
    views: Mutex<HashMap<ViewKey, AbortHandle>>,
}

impl SubscriptionManager {
    pub fn new(store: Arc<dyn RequestStore>, pubsub: Arc<MemoryPubSub>) -> Self {
        Self {
            store,
            pubsub,
            views: Mutex::new(HashMap::new()),
        }
    }

    /// Open a view: initial load plus change subscription.
    ///
    /// Opening a key that is already open tears the previous view down
    /// first; holders of the old handle see it close.
    pub async fn open(&self, key: ViewKey) -> AppResult<LiveView> {
        self.close(key);

        // Subscribe before loading so nothing committed in between is missed.
        let feed = self.pubsub.subscribe(key.channel());
        let initial = load(self.store.as_ref(), key).await?;
        let (tx, rx) = watch::channel(Arc::new(initial));

        let task = tokio::spawn(feed_view(key, self.store.clone(), feed, tx));
        if let Ok(mut views) = self.views.lock() {
            if let Some(previous) = views.insert(key, task.abort_handle()) {
                previous.abort();
            }
        }
        info!(view = %key, "Opened live view");
        Ok(LiveView::new(key, rx))
    }

    /// Tear a view down. Returns `false` when it was not open.
    pub fn close(&self, key: ViewKey) -> bool {
        let removed = self.views.lock().ok().and_then(|mut views| views.remove(&key));
        match removed {
            Some(task) => {
                task.abort();
                debug!(view = %key, "Closed live view");
                true
            }
            None => false,
        }
    }

    /// Number of views with a running feed.
    pub fn open_count(&self) -> usize {
        self.views
            .lock()
            .map(|views| views.values().filter(|t| !t.is_finished()).count())
            .unwrap_or(0)
    }

    /// Tear every view down.
    pub fn close_all(&self) {
        if let Ok(mut views) = self.views.lock() {
            for (_, task) in views.drain() {
                task.abort();
            }
        }
    }
}

impl Drop for SubscriptionManager {
    fn drop(&mut self) {
        self.close_all();
    }
}

async fn load(store: &dyn RequestStore, key: ViewKey) -> AppResult<Vec<ServiceRequest>> {
    match key {
        ViewKey::ByCustomer(id) => store.list_by_customer(id).await,
        ViewKey::ByDispatcher(id) => store.list_by_dispatcher(id).await,
        ViewKey::Global => store.list_all().await,
    }
}

async fn feed_view(
    key: ViewKey,
    store: Arc<dyn RequestStore>,
    mut feed: broadcast::Receiver<DomainEvent>,
    tx: watch::Sender<Arc<Vec<ServiceRequest>>>,
) {
    loop {
        tokio::select! {
            _ = tx.closed() => break,
            received = feed.recv() => match received {
                Ok(event) => {
                    if let Some(record) = snapshot_of(&event) {
                        if key.matches(&record) {
                            tx.send_if_modified(|records| upsert(Arc::make_mut(records), record));
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(view = %key, skipped, "Live view lagged; reloading");
                    match load(store.as_ref(), key).await {
                        Ok(fresh) => {
                            tx.send_replace(Arc::new(fresh));
                        }
                        Err(e) => warn!(view = %key, error = %e, "Reload failed"),
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    debug!(view = %key, "Live view feed stopped");
}

fn snapshot_of(event: &DomainEvent) -> Option<ServiceRequest> {
    let EventPayload::Request(change) = &event.payload else {
        return None;
    };
    match serde_json::from_value(change.snapshot().clone()) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(event_id = %event.id, error = %e, "Unreadable request snapshot");
            None
        }
    }
}

/// Insert or replace `record`, keeping newest-first order. Returns whether
/// anything changed; older versions are ignored.
fn upsert(records: &mut Vec<ServiceRequest>, record: ServiceRequest) -> bool {
    if let Some(existing) = records.iter_mut().find(|r| r.id == record.id) {
        if existing.version >= record.version {
            return false;
        }
        *existing = record;
        return true;
    }
    let at = records
        .iter()
        .position(|r| (r.created_at, r.id.as_uuid()) < (record.created_at, record.id.as_uuid()))
        .unwrap_or(records.len());
    records.insert(at, record);
    true
}
