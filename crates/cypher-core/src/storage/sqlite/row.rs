//! Note row type for database queries.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CypherError, Result};
use crate::storage::types::{NoteId, NoteRecord};

/// Raw row data from the notes table, before parsing into domain types.
#[derive(Debug)]
pub struct NoteRow {
    pub id: String,
    pub title: Option<String>,
    pub body: Option<Vec<u8>>,
    pub modified: String,
}

impl NoteRow {
    pub const COLUMNS: &'static str = "id, title, body, modified";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            body: row.get(2)?,
            modified: row.get(3)?,
        })
    }

    /// Parse into a handle and domain record.
    pub fn into_note(self) -> Result<(NoteId, NoteRecord)> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| CypherError::Storage(format!("Invalid note UUID: {}", e)))?;
        let modified = DateTime::parse_from_rfc3339(&self.modified)
            .map_err(|e| CypherError::Storage(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok((
            NoteId::from_uuid(id),
            NoteRecord {
                title: self.title,
                body: self.body,
                modified,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_row_parses() {
        let id = Uuid::new_v4();
        let row = NoteRow {
            id: id.to_string(),
            title: Some("groceries".to_string()),
            body: None,
            modified: "2023-08-06T10:00:00+00:00".to_string(),
        };

        let (note_id, record) = row.into_note().unwrap();
        assert_eq!(note_id.as_uuid(), &id);
        assert_eq!(record.title.as_deref(), Some("groceries"));
        assert_eq!(record.modified.to_rfc3339(), "2023-08-06T10:00:00+00:00");
    }

    #[test]
    fn test_bad_uuid_is_storage_error() {
        let row = NoteRow {
            id: "not-a-uuid".to_string(),
            title: None,
            body: None,
            modified: Utc::now().to_rfc3339(),
        };

        let result = row.into_note();
        assert!(matches!(result, Err(CypherError::Storage(_))));
    }
}
