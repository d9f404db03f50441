//! Email verification tokens.
//!
//! The raw token is handed to the user once; only its SHA-256 digest is
//! stored.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// Generate a fresh random token.
pub fn generate() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hex digest used as the storage key.
pub fn digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.trim().as_bytes()))
}
