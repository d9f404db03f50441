//! Account registration, email verification, and login.

pub mod service;
pub mod token;

pub use service::{IdentityService, Registration, RegistrationInput, Session};
