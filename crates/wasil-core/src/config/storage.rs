//! Media storage configuration.

use serde::{Deserialize, Serialize};

/// Object storage configuration for uploaded media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root path for local media storage.
    #[serde(default = "default_root")]
    pub root_path: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Accepted MIME types for uploads.
    #[serde(default = "default_allowed_types")]
    pub allowed_mime_types: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root(),
            max_upload_size_bytes: default_max_upload(),
            allowed_mime_types: default_allowed_types(),
        }
    }
}

fn default_root() -> String {
    "./data/media".to_string()
}

fn default_max_upload() -> u64 {
    25 * 1024 * 1024
}

fn default_allowed_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/webp", "video/mp4"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}
