//! Password policy for new accounts.

use wasil_core::config::AuthConfig;
use wasil_core::error::AppError;

/// Checks length and estimated strength of new passwords.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Returns the first violated rule as a validation error.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, user_inputs);
        if estimate.score() < zxcvbn::Score::Two {
            return Err(AppError::validation(
                "Password is too easy to guess. Try a longer passphrase.",
            ));
        }

        Ok(())
    }
}
