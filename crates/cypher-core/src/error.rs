//! Error types for the encrypted note store.
//!
//! Errors are descriptive at the core level; the surrounding application
//! maps them to prompts (wrong password) or aborts (storage failures).

use thiserror::Error;

use crate::storage::types::NoteId;

/// Result type alias for note store operations.
pub type Result<T> = std::result::Result<T, CypherError>;

/// Core error type for note store operations.
#[derive(Debug, Error)]
pub enum CypherError {
    /// Ciphertext could not be authenticated under the given password.
    ///
    /// Covers wrong passwords as well as tampered, truncated or malformed data.
    #[error("Authentication failed: wrong password or corrupted data")]
    AuthenticationFailure,

    /// The password does not match the stored canary
    #[error("Wrong password")]
    WrongPassword,

    /// The operation needs an unlocked session
    #[error("Note store is locked")]
    Locked,

    /// Note handle unknown to the record store
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),

    /// Password rejected by the caller-side policy
    #[error("Password must be at least {min} characters (got {actual})")]
    WeakPassword { min: usize, actual: usize },

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Encryption-side failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Destroy failed and restoring the previous state failed as well
    #[error("Destroy failed and rollback was incomplete: {0}")]
    DestroyIncomplete(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl CypherError {
    /// Whether this error comes from the durable storage layer.
    ///
    /// Storage failures are fatal to the current session: the caller should
    /// abort rather than keep working against a stale cache.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            CypherError::Storage(_)
                | CypherError::Sqlite { .. }
                | CypherError::Io { .. }
                | CypherError::Json { .. }
                | CypherError::DestroyIncomplete(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_failure_classification() {
        assert!(CypherError::Storage("disk full".to_string()).is_storage_failure());
        assert!(CypherError::from(std::io::Error::other("boom")).is_storage_failure());
        assert!(!CypherError::WrongPassword.is_storage_failure());
        assert!(!CypherError::AuthenticationFailure.is_storage_failure());
        assert!(!CypherError::Locked.is_storage_failure());
    }

    #[test]
    fn test_weak_password_message() {
        let err = CypherError::WeakPassword { min: 4, actual: 2 };
        assert_eq!(
            err.to_string(),
            "Password must be at least 4 characters (got 2)"
        );
    }
}
