//! Capability-aware assignment.

use rand::seq::IndexedRandom;

use wasil_core::types::UserId;
use wasil_entity::dispatcher::Dispatcher;
use wasil_entity::request::ServiceRequest;

use super::AssignmentPolicy;

/// Picks randomly among dispatchers supporting the requested service.
///
/// Falls back to the whole directory when nobody lists the service.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityAssignment;

impl AssignmentPolicy for CapabilityAssignment {
    fn name(&self) -> &'static str {
        "capability"
    }

    fn pick(&self, request: &ServiceRequest, directory: &[Dispatcher]) -> Option<UserId> {
        let capable: Vec<&Dispatcher> = directory
            .iter()
            .filter(|d| d.supports(&request.service_id))
            .collect();

        let mut rng = rand::rng();
        if capable.is_empty() {
            directory.choose(&mut rng).map(|d| d.id)
        } else {
            capable.choose(&mut rng).map(|d| d.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::fixtures::{dispatcher, request};

    #[test]
    fn test_prefers_capable_dispatcher() {
        let samer = dispatcher("Samer", &["solar-check", "leak-repair"]);
        let rami = dispatcher("Rami", &["wifi-fix"]);
        let directory = vec![samer.clone(), rami.clone()];
        for _ in 0..20 {
            assert_eq!(
                CapabilityAssignment.pick(&request("wifi-fix"), &directory),
                Some(rami.id)
            );
        }
    }

    #[test]
    fn test_falls_back_to_everyone() {
        let directory = vec![dispatcher("Samer", &["solar-check"])];
        assert_eq!(
            CapabilityAssignment.pick(&request("home-chef"), &directory),
            Some(directory[0].id)
        );
    }
}
