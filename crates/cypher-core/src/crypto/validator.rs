//! Password validation through a stored canary.
//!
//! The first password ever presented encrypts a random probe; the resulting
//! ciphertext (the canary) is persisted in settings. Later attempts are
//! checked by decrypting the canary. The password itself is never stored.

use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::crypto::cipher::{decrypt, encrypt};
use crate::error::{CypherError, Result};
use crate::storage::traits::SettingsStore;
use crate::storage::types::StoreSettings;

/// Length of the random probe encrypted into the canary.
pub const CANARY_PROBE_LENGTH: usize = 32;

/// Outcome of a successful validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// No canary existed; one was written under this password.
    Initialized,
    /// The canary decrypted under this password.
    Verified,
}

/// Validates passwords against the canary held in a `SettingsStore`.
#[derive(Debug)]
pub struct PasswordValidator<S: SettingsStore> {
    settings: S,
}

impl<S: SettingsStore> PasswordValidator<S> {
    pub fn new(settings: S) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Whether a password has been chosen for this store.
    ///
    /// Canary presence is the only signal; the `initialized` flag is advisory.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.settings.load()?.canary.is_some())
    }

    /// Check `password`, or adopt it when the store has no canary yet.
    ///
    /// An empty password is not special-cased here; length policy belongs to
    /// the caller (see `PasswordPolicy`).
    ///
    /// # Errors
    ///
    /// Returns `CypherError::WrongPassword` if the canary does not decrypt.
    /// Settings failures propagate unchanged.
    pub fn validate_or_initialize(&mut self, password: &str) -> Result<Validation> {
        let current = self.settings.load()?;

        let canary = match current.canary {
            Some(canary) => canary,
            None => {
                if current.initialized {
                    warn!(
                        component = "validator",
                        op = "validate",
                        "initialized flag set without canary; treating store as new"
                    );
                }
                self.initialize(password)?;
                return Ok(Validation::Initialized);
            }
        };

        match decrypt(&canary, password) {
            Ok(_) => {}
            Err(CypherError::AuthenticationFailure) => {
                info!(component = "validator", op = "validate", "password rejected");
                return Err(CypherError::WrongPassword);
            }
            Err(err) => return Err(err),
        }

        if !current.initialized {
            warn!(
                component = "validator",
                op = "validate",
                "canary present without initialized flag; repairing"
            );
            self.settings.save(&StoreSettings {
                initialized: true,
                canary: Some(canary),
            })?;
        }

        Ok(Validation::Verified)
    }

    /// Remove the canary and the initialized flag together.
    pub fn reset(&mut self) -> Result<()> {
        self.settings.save(&StoreSettings::default())
    }

    pub(crate) fn snapshot(&self) -> Result<StoreSettings> {
        self.settings.load()
    }

    pub(crate) fn restore(&mut self, snapshot: &StoreSettings) -> Result<()> {
        self.settings.save(snapshot)
    }

    fn initialize(&mut self, password: &str) -> Result<()> {
        let mut probe = Zeroizing::new([0u8; CANARY_PROBE_LENGTH]);
        getrandom::getrandom(&mut probe[..])
            .map_err(|e| CypherError::Crypto(format!("Failed to generate canary probe: {}", e)))?;

        let canary = encrypt(&probe[..], password)?;
        self.settings.save(&StoreSettings {
            initialized: true,
            canary: Some(canary),
        })?;

        info!(component = "validator", op = "initialize", "canary written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemorySettings;

    #[test]
    fn test_first_use_initializes() {
        let mut validator = PasswordValidator::new(MemorySettings::new());
        assert!(!validator.is_initialized().unwrap());

        let outcome = validator.validate_or_initialize("hunter22").unwrap();

        assert_eq!(outcome, Validation::Initialized);
        assert!(validator.is_initialized().unwrap());
        let stored = validator.settings().load().unwrap();
        assert!(stored.initialized);
        assert!(stored.canary.is_some());
    }

    #[test]
    fn test_same_password_twice_is_idempotent() {
        let mut validator = PasswordValidator::new(MemorySettings::new());
        validator.validate_or_initialize("hunter22").unwrap();
        let after_first = validator.settings().load().unwrap();

        let outcome = validator.validate_or_initialize("hunter22").unwrap();

        assert_eq!(outcome, Validation::Verified);
        assert_eq!(validator.settings().load().unwrap(), after_first);
    }

    #[test]
    fn test_wrong_password_rejected_without_changes() {
        let mut validator = PasswordValidator::new(MemorySettings::new());
        validator.validate_or_initialize("hunter22").unwrap();
        let before = validator.settings().load().unwrap();

        let result = validator.validate_or_initialize("wrong");

        assert!(matches!(result, Err(CypherError::WrongPassword)));
        assert_eq!(validator.settings().load().unwrap(), before);
    }

    #[test]
    fn test_canary_does_not_contain_password() {
        let mut validator = PasswordValidator::new(MemorySettings::new());
        validator.validate_or_initialize("PASSWORD_MARKER").unwrap();

        let canary = validator.settings().load().unwrap().canary.unwrap();
        let haystack = String::from_utf8_lossy(&canary);
        assert!(!haystack.contains("PASSWORD_MARKER"));
    }

    #[test]
    fn test_reset_returns_to_uninitialized() {
        let mut validator = PasswordValidator::new(MemorySettings::new());
        validator.validate_or_initialize("hunter22").unwrap();

        validator.reset().unwrap();

        assert!(!validator.is_initialized().unwrap());
        assert_eq!(
            validator.validate_or_initialize("another").unwrap(),
            Validation::Initialized
        );
    }

    #[test]
    fn test_missing_flag_is_repaired() {
        let mut validator = PasswordValidator::new(MemorySettings::new());
        validator.validate_or_initialize("hunter22").unwrap();
        let mut settings = validator.settings().load().unwrap();
        settings.initialized = false;
        validator.restore(&settings).unwrap();

        assert_eq!(
            validator.validate_or_initialize("hunter22").unwrap(),
            Validation::Verified
        );
        assert!(validator.settings().load().unwrap().initialized);
    }

    #[test]
    fn test_flag_without_canary_bootstraps() {
        let mut settings = MemorySettings::new();
        settings
            .save(&StoreSettings {
                initialized: true,
                canary: None,
            })
            .unwrap();
        let mut validator = PasswordValidator::new(settings);

        assert!(!validator.is_initialized().unwrap());
        assert_eq!(
            validator.validate_or_initialize("hunter22").unwrap(),
            Validation::Initialized
        );
    }

    #[test]
    fn test_empty_password_uses_canary() {
        let mut validator = PasswordValidator::new(MemorySettings::new());

        assert_eq!(
            validator.validate_or_initialize("").unwrap(),
            Validation::Initialized
        );
        assert!(validator.settings().load().unwrap().canary.is_some());
        assert_eq!(
            validator.validate_or_initialize("").unwrap(),
            Validation::Verified
        );
        assert!(matches!(
            validator.validate_or_initialize("x"),
            Err(CypherError::WrongPassword)
        ));
    }
}
