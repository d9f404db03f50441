//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Output shape of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line, for log shippers.
    #[default]
    Json,
    /// Multi-line human-readable output for local development.
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset,
    /// e.g. `"wasil_service=debug,info"`.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_level() -> String {
    "info,wasil_service=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_is_read_lowercase() {
        let config: LoggingConfig = serde_json::from_str(r#"{"format":"pretty"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.level, "info,wasil_service=debug");
    }
}
