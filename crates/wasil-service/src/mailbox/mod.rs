//! Per-user notification mailbox.

pub mod service;

pub use service::MailboxService;
