//! Uniform random assignment.

use rand::seq::IndexedRandom;

use wasil_core::types::UserId;
use wasil_entity::dispatcher::Dispatcher;
use wasil_entity::request::ServiceRequest;

use super::AssignmentPolicy;

/// Picks uniformly among all dispatchers, ignoring capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAssignment;

impl AssignmentPolicy for RandomAssignment {
    fn name(&self) -> &'static str {
        "random"
    }

    fn pick(&self, _request: &ServiceRequest, directory: &[Dispatcher]) -> Option<UserId> {
        directory.choose(&mut rand::rng()).map(|d| d.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::fixtures::{dispatcher, request};

    #[test]
    fn test_empty_directory_yields_none() {
        assert_eq!(RandomAssignment.pick(&request("wifi-fix"), &[]), None);
    }

    #[test]
    fn test_pick_is_from_directory() {
        let directory = vec![dispatcher("Samer", &[]), dispatcher("Rami", &[])];
        let req = request("wifi-fix");
        for _ in 0..20 {
            let picked = RandomAssignment.pick(&req, &directory).unwrap();
            assert!(directory.iter().any(|d| d.id == picked));
        }
    }
}
