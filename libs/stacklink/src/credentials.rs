//! Identity credentials and their connect-time validation.

use std::fmt;

use crate::error::ApiError;
use crate::secret::SecretString;

/// Stable rejection message for all-digit passwords.
const NUMERIC_PASSWORD_MESSAGE: &str = "Numeric-only passwords are not accepted";

/// Identity credentials presented to the control plane.
///
/// `Debug` redacts the password.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    /// Bundle a username with its password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check the credentials before any connection attempt.
    ///
    /// Non-empty passwords consisting entirely of ASCII digits are rejected.
    /// Runs locally; a rejection means the raw connector is never called.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::CredentialsRejected`] with the stable message
    /// `Numeric-only passwords are not accepted`.
    pub fn validate(&self) -> Result<(), ApiError> {
        let password = self.password.expose();
        if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::CredentialsRejected(
                NUMERIC_PASSWORD_MESSAGE.to_owned(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
