//! View keys and the handle callers hold.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use wasil_core::types::UserId;
use wasil_entity::request::ServiceRequest;

use crate::channel::Channel;

/// The query shape of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKey {
    /// Requests owned by a customer.
    ByCustomer(UserId),
    /// Requests assigned to a dispatcher.
    ByDispatcher(UserId),
    /// Every request.
    Global,
}

impl ViewKey {
    pub(crate) fn channel(&self) -> Channel {
        match self {
            ViewKey::ByCustomer(id) => Channel::Customer(id.into_uuid()),
            ViewKey::ByDispatcher(id) => Channel::Dispatcher(id.into_uuid()),
            ViewKey::Global => Channel::AdminRequests,
        }
    }

    /// Whether `request` belongs in this view.
    pub fn matches(&self, request: &ServiceRequest) -> bool {
        match self {
            ViewKey::ByCustomer(id) => request.customer_id == *id,
            ViewKey::ByDispatcher(id) => request.is_assigned_to(*id),
            ViewKey::Global => true,
        }
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.channel(), f)
    }
}

/// A live, newest-first list of requests.
///
/// Cloning shares the same view. When every clone is dropped the feeding
/// task stops on its own.
#[derive(Debug, Clone)]
pub struct LiveView {
    key: ViewKey,
    rx: watch::Receiver<Arc<Vec<ServiceRequest>>>,
}

impl LiveView {
    pub(crate) fn new(key: ViewKey, rx: watch::Receiver<Arc<Vec<ServiceRequest>>>) -> Self {
        Self { key, rx }
    }

    pub fn key(&self) -> ViewKey {
        self.key
    }

    /// Current contents.
    pub fn snapshot(&self) -> Arc<Vec<ServiceRequest>> {
        self.rx.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.rx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait for the next change. Returns `false` once the view was torn down.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Wait until `predicate` holds for the contents. Returns `false` if
    /// the view is torn down first.
    pub async fn wait_until<F>(&mut self, mut predicate: F) -> bool
    where
        F: FnMut(&[ServiceRequest]) -> bool,
    {
        self.rx.wait_for(|records| predicate(records)).await.is_ok()
    }
}
