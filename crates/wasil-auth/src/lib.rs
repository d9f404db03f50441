//! # wasil-auth
//!
//! Identity for Wasil.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and zxcvbn strength checks
//! - `jwt`: signed session tokens
//! - `identity`: registration, email verification, and login

pub mod identity;
pub mod jwt;
pub mod password;

pub use identity::{IdentityService, Registration, RegistrationInput, Session};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
