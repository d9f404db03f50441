//! Short reassurance texts shown to customers when work starts.

pub mod gemini;
pub mod service;

pub use gemini::GeminiClient;
pub use service::{ReassuranceService, TextGenerator};
