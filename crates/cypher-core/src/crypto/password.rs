//! Caller-side password policy.
//!
//! The unlock path deliberately does not call this: it is guidance the
//! application applies before choosing a password, not a security boundary.

use crate::error::{CypherError, Result};

/// Default minimum password length in characters.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 4;

/// Minimum requirements for a newly chosen password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl PasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Check `password` against the policy.
    ///
    /// Length is counted in characters, not bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use cypher_core::crypto::PasswordPolicy;
    ///
    /// let policy = PasswordPolicy::default();
    /// assert!(policy.check("hunter22").is_ok());
    /// assert!(policy.check("abc").is_err());
    /// ```
    pub fn check(&self, password: &str) -> Result<()> {
        if password.trim().is_empty() {
            return Err(CypherError::InvalidInput(
                "Password cannot be empty".to_string(),
            ));
        }

        let actual = password.chars().count();
        if actual < self.min_length {
            return Err(CypherError::WeakPassword {
                min: self.min_length,
                actual,
            });
        }

        Ok(())
    }
}
