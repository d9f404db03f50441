//! Reassurance composition with a bounded wait and a fixed fallback.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use wasil_core::AppResult;
use wasil_core::config::ReassuranceConfig;
use wasil_entity::request::ServiceRequest;

/// Produces free text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync + std::fmt::Debug {
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// Writes the status update a customer sees once work begins.
///
/// Never fails: errors, timeouts and empty output all yield the
/// configured fallback message.
#[derive(Debug, Clone)]
pub struct ReassuranceService {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
    fallback: String,
}

impl ReassuranceService {
    pub fn new(config: &ReassuranceConfig, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator: if config.enabled { generator } else { None },
            timeout: Duration::from_millis(config.timeout_ms),
            fallback: config.fallback_message.clone(),
        }
    }

    /// A service that always returns the fallback.
    pub fn disabled(config: &ReassuranceConfig) -> Self {
        Self::new(config, None)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Reassurance text for `request`.
    pub async fn compose(&self, request: &ServiceRequest) -> String {
        let Some(generator) = &self.generator else {
            return self.fallback.clone();
        };

        let prompt = prompt_for(request);
        match tokio::time::timeout(self.timeout, generator.generate(&prompt)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(Ok(_)) => {
                warn!(request_id = %request.id, "Text generation returned nothing; using fallback");
                self.fallback.clone()
            }
            Ok(Err(e)) => {
                warn!(request_id = %request.id, error = %e, "Text generation failed; using fallback");
                self.fallback.clone()
            }
            Err(_) => {
                warn!(request_id = %request.id, timeout_ms = self.timeout.as_millis() as u64, "Text generation timed out; using fallback");
                self.fallback.clone()
            }
        }
    }
}

fn prompt_for(request: &ServiceRequest) -> String {
    format!(
        "You are a concierge coordinator in Lebanon. Write a warm, reassuring status update \
         for an expat whose parent ({parent}) in {location} has a service request for \"{title}\". \
         The current status is \"{status}\". Keep it to at most 2 sentences.",
        parent = request.parent_name,
        location = request.location.label(),
        title = request.title,
        status = request.status.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::fixtures;
    use wasil_core::AppError;

    #[derive(Debug)]
    struct Fixed(AppResult<String>);

    #[async_trait]
    impl TextGenerator for Fixed {
        async fn generate(&self, _prompt: &str) -> AppResult<String> {
            self.0.clone()
        }
    }

    #[derive(Debug)]
    struct Slow;

    #[async_trait]
    impl TextGenerator for Slow {
        async fn generate(&self, _prompt: &str) -> AppResult<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("late".into())
        }
    }

    fn service(generator: impl TextGenerator + 'static) -> ReassuranceService {
        ReassuranceService::new(&ReassuranceConfig::default(), Some(Arc::new(generator)))
    }

    #[tokio::test]
    async fn test_uses_generated_text() {
        let svc = service(Fixed(Ok("  Rami is with your mother now. ".into())));
        let text = svc.compose(&fixtures::request("wifi-fix")).await;
        assert_eq!(text, "Rami is with your mother now.");
    }

    #[tokio::test]
    async fn test_falls_back_on_error_and_empty() {
        let request = fixtures::request("wifi-fix");
        let failing = service(Fixed(Err(AppError::external("boom"))));
        assert_eq!(failing.compose(&request).await, failing.fallback());
        let empty = service(Fixed(Ok("   ".into())));
        assert_eq!(empty.compose(&request).await, empty.fallback());
    }

    #[tokio::test(start_paused = true)]
    async fn test_falls_back_on_timeout() {
        let svc = service(Slow);
        let text = svc.compose(&fixtures::request("wifi-fix")).await;
        assert_eq!(text, svc.fallback());
    }

    #[test]
    fn test_prompt_mentions_parent_and_status() {
        let prompt = prompt_for(&fixtures::request("wifi-fix"));
        assert!(prompt.contains("Nadia"));
        assert!(prompt.contains("Tripoli"));
        assert!(prompt.contains("2 sentences"));
    }
}
