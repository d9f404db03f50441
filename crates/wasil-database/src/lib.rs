//! # wasil-database
//!
//! Persistence for Wasil: the store traits the services depend on, the
//! PostgreSQL repositories implementing them, and a process-local store
//! used for development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{
    DependantStore, DispatcherStore, NotificationStore, RequestStore, Stores, UserStore,
    VerificationToken,
};
