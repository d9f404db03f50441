//! # wasil-service
//!
//! Business logic for Wasil. The [`RequestLifecycle`] controller owns the
//! request state machine; the other services support it with catalog
//! quotes, dispatcher lookup, dependant profiles, mailbox access, media
//! uploads, and administrator reporting.
//!
//! Services follow constructor injection: every dependency is handed in
//! as an `Arc` at construction time.

pub mod admin;
pub mod assignment;
pub mod catalog;
pub mod context;
pub mod dependant;
pub mod directory;
pub mod lifecycle;
pub mod mailbox;
pub mod media;
pub mod reassurance;

pub use admin::{AdminOverview, AdminService};
pub use assignment::{AssignmentPolicy, CapabilityAssignment, RandomAssignment};
pub use catalog::{CatalogEntry, CatalogService};
pub use context::RequestContext;
pub use dependant::DependantService;
pub use directory::DispatcherDirectory;
pub use lifecycle::{CreateRequestInput, RequestLifecycle};
pub use mailbox::MailboxService;
pub use media::{DispatcherMedia, MediaService, MediaTarget};
pub use reassurance::{GeminiClient, ReassuranceService, TextGenerator};
