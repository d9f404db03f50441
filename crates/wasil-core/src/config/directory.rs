//! Dispatcher directory cache configuration.

use serde::{Deserialize, Serialize};

/// In-process cache in front of the dispatcher directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Maximum cached entries.
    #[serde(default = "default_capacity")]
    pub cache_capacity: u64,
    /// Entry time-to-live in seconds.
    #[serde(default = "default_ttl")]
    pub cache_ttl_seconds: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_capacity(),
            cache_ttl_seconds: default_ttl(),
        }
    }
}

fn default_capacity() -> u64 {
    1024
}

fn default_ttl() -> u64 {
    60
}
