//! Reassurance text generation configuration.

use serde::{Deserialize, Serialize};

/// Settings for the text-generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassuranceConfig {
    /// Whether generation is attempted at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL of the generation API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key; generation is skipped when empty.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Text stored when generation fails.
    #[serde(default = "default_fallback")]
    pub fallback_message: String,
}

impl Default for ReassuranceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: String::new(),
            timeout_ms: default_timeout(),
            temperature: default_temperature(),
            fallback_message: default_fallback(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-flash-latest".to_string()
}

fn default_timeout() -> u64 {
    4000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_fallback() -> String {
    "Our team is on the ground ensuring everything goes smoothly.".to_string()
}
