//! CORS for the customer, dispatcher and admin front ends.

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use wasil_core::config::CorsConfig;

/// Build the CORS layer. `"*"` in the origin list allows every origin;
/// entries that are not valid header values are skipped with a warning.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(&config.allowed_origins))
        .allow_methods(
            config
                .allowed_methods
                .iter()
                .filter_map(|m| m.parse::<Method>().ok())
                .collect::<Vec<_>>(),
        )
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age_seconds))
}

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|o| o == "*") {
        return AllowOrigin::any();
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(parsed)
}
