//! Request lifecycle and pricing configuration.

use serde::{Deserialize, Serialize};

/// Which assignment strategy picks dispatchers for new requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    /// Uniform random pick over the whole directory.
    #[default]
    Random,
    /// Random pick among dispatchers supporting the requested service.
    Capability,
}

/// Pricing and lifecycle rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Markup applied over the catalog base price, in percent.
    #[serde(default = "default_markup")]
    pub markup_percent: u32,
    /// Share of the price kept when a request is cancelled, in percent.
    #[serde(default = "default_cancellation_fee")]
    pub cancellation_fee_percent: u32,
    /// Dispatcher assignment strategy.
    #[serde(default)]
    pub assignment_strategy: AssignmentStrategy,
    /// Maximum length of urgent notes.
    #[serde(default = "default_max_notes")]
    pub max_notes_length: usize,
    /// Maximum length of a cancellation reason.
    #[serde(default = "default_max_reason")]
    pub max_reason_length: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            markup_percent: default_markup(),
            cancellation_fee_percent: default_cancellation_fee(),
            assignment_strategy: AssignmentStrategy::default(),
            max_notes_length: default_max_notes(),
            max_reason_length: default_max_reason(),
        }
    }
}

fn default_markup() -> u32 {
    50
}

fn default_cancellation_fee() -> u32 {
    50
}

fn default_max_notes() -> usize {
    2000
}

fn default_max_reason() -> usize {
    500
}
