//! Dispatcher assignment strategies.

pub mod capability;
pub mod random;

use std::sync::Arc;

use wasil_core::config::AssignmentStrategy;
use wasil_core::types::UserId;
use wasil_entity::dispatcher::Dispatcher;
use wasil_entity::request::ServiceRequest;

pub use capability::CapabilityAssignment;
pub use random::RandomAssignment;

/// Picks the dispatcher for a new request.
///
/// `directory` holds the active dispatchers. Returning `None` means
/// nobody can take the request.
pub trait AssignmentPolicy: Send + Sync + std::fmt::Debug {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    /// Choose a dispatcher.
    fn pick(&self, request: &ServiceRequest, directory: &[Dispatcher]) -> Option<UserId>;
}

/// Build the configured strategy.
pub fn policy_for(strategy: AssignmentStrategy) -> Arc<dyn AssignmentPolicy> {
    match strategy {
        AssignmentStrategy::Random => Arc::new(RandomAssignment),
        AssignmentStrategy::Capability => Arc::new(CapabilityAssignment),
    }
}
