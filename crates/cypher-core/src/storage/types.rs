//! Core types for stored notes and store settings.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable handle for a note, issued by the record store on creation.
///
/// Handles are not sequential and are never reused after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(Uuid);

impl NoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A note as held by the record store.
///
/// `body` is ciphertext produced under the store's password; it is `None`
/// until the note is first written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub title: Option<String>,
    pub body: Option<Vec<u8>>,
    pub modified: DateTime<Utc>,
}

impl NoteRecord {
    /// An untitled note with no body.
    pub fn empty(modified: DateTime<Utc>) -> Self {
        Self {
            title: None,
            body: None,
            modified,
        }
    }
}

/// Entry of the in-memory note index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: NoteId,
    /// Title, empty when the note has none
    pub title: String,
    pub modified: DateTime<Utc>,
    pub has_body: bool,
}

impl NoteSummary {
    pub fn from_record(id: NoteId, record: &NoteRecord) -> Self {
        Self {
            id,
            title: record.title.clone().unwrap_or_default(),
            modified: record.modified,
            has_body: record.body.is_some(),
        }
    }
}

/// Settings persisted outside the record store.
///
/// Both fields are written and cleared together in a single save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub initialized: bool,
    /// Canary ciphertext, present once a password has been chosen
    #[serde(
        default,
        with = "canary_base64",
        skip_serializing_if = "Option::is_none"
    )]
    pub canary: Option<Vec<u8>>,
}

impl StoreSettings {
    pub fn is_empty(&self) -> bool {
        !self.initialized && self.canary.is_none()
    }
}

mod canary_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|value| STANDARD.decode(value).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_ids_are_unique() {
        assert_ne!(NoteId::new(), NoteId::new());
    }

    #[test]
    fn test_summary_of_empty_record() {
        let id = NoteId::new();
        let record = NoteRecord::empty(Utc::now());
        let summary = NoteSummary::from_record(id, &record);

        assert_eq!(summary.id, id);
        assert_eq!(summary.title, "");
        assert!(!summary.has_body);
    }

    #[test]
    fn test_settings_json_encodes_canary_as_base64() {
        let settings = StoreSettings {
            initialized: true,
            canary: Some(vec![0xde, 0xad, 0xbe, 0xef]),
        };

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"3q2+7w==\""));

        let parsed: StoreSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_settings_missing_fields_default() {
        let parsed: StoreSettings = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_settings_rejects_bad_base64() {
        let result: std::result::Result<StoreSettings, _> =
            serde_json::from_str(r#"{"initialized":true,"canary":"%%%"}"#);
        assert!(result.is_err());
    }
}
