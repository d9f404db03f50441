//! # wasil-api
//!
//! HTTP API layer for Wasil built on Axum.
//!
//! Provides the REST endpoints under `/api`, media download under
//! `/media`, the `/ws` WebSocket upgrade, middleware (CORS, request
//! logging, tracing, compression), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
