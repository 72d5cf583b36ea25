//! Unlocked-session state.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::storage::types::NoteId;

/// The password of an unlocked store.
///
/// Held only in memory and zeroized when dropped. Never serialized.
pub(crate) struct Session {
    password: SecretString,
    unlocked_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(password: &str) -> Self {
        Self {
            password: SecretString::from(password.to_string()),
            unlocked_at: Utc::now(),
        }
    }

    /// Borrow the password for an immediate encrypt/decrypt call.
    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }

    pub(crate) fn unlocked_at(&self) -> DateTime<Utc> {
        self.unlocked_at
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("password", &"[REDACTED]")
            .field("unlocked_at", &self.unlocked_at)
            .finish()
    }
}

/// Text of the note currently open in an editor, not yet encrypted.
pub(crate) struct Draft {
    pub(crate) id: NoteId,
    pub(crate) text: Zeroizing<String>,
}

impl Draft {
    pub(crate) fn new(id: NoteId, text: &str) -> Self {
        Self {
            id,
            text: Zeroizing::new(text.to_string()),
        }
    }
}

impl std::fmt::Debug for Draft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Draft")
            .field("id", &self.id)
            .field("text", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_debug_redacts() {
        let session = Session::new("PASSWORD_MARKER");
        let debug_output = format!("{:?}", session);

        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("PASSWORD_MARKER"));
        assert!(!debug_output.contains(&hex::encode("PASSWORD_MARKER")));
        assert_eq!(session.password(), "PASSWORD_MARKER");
    }

    #[test]
    fn test_draft_debug_redacts() {
        let draft = Draft::new(NoteId::new(), "buy milk");
        let debug_output = format!("{:?}", draft);

        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("buy milk"));
    }
}
