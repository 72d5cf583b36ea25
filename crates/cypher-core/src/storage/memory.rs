//! In-process storage backends.
//!
//! Nothing here survives the process. Useful for tests and for sessions that
//! never touch disk.

use crate::error::{CypherError, Result};
use crate::storage::traits::{RecordStore, SettingsStore};
use crate::storage::types::{NoteId, NoteRecord, StoreSettings};

/// Vec-backed record store preserving insertion order.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    notes: Vec<(NoteId, NoteRecord)>,
    dirty: bool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|(note_id, _)| note_id == id)
    }
}

impl RecordStore for MemoryRecordStore {
    fn create(&mut self, record: &NoteRecord) -> Result<NoteId> {
        let id = NoteId::new();
        self.notes.push((id, record.clone()));
        self.dirty = true;
        Ok(id)
    }

    fn fetch_all(&self) -> Result<Vec<(NoteId, NoteRecord)>> {
        Ok(self.notes.clone())
    }

    fn fetch(&self, id: &NoteId) -> Result<Option<NoteRecord>> {
        Ok(self.position(id).map(|idx| self.notes[idx].1.clone()))
    }

    fn update(&mut self, id: &NoteId, record: &NoteRecord) -> Result<()> {
        let idx = self.position(id).ok_or(CypherError::NoteNotFound(*id))?;
        self.notes[idx].1 = record.clone();
        self.dirty = true;
        Ok(())
    }

    fn delete(&mut self, id: &NoteId) -> Result<bool> {
        match self.position(id) {
            Some(idx) => {
                self.notes.remove(idx);
                self.dirty = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn destroy_all(&mut self) -> Result<()> {
        self.notes.clear();
        self.dirty = false;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.dirty = false;
        Ok(())
    }

    fn has_pending_changes(&self) -> bool {
        self.dirty
    }
}

/// Settings held in memory.
#[derive(Debug, Default)]
pub struct MemorySettings {
    settings: StoreSettings,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<StoreSettings> {
        Ok(self.settings.clone())
    }

    fn save(&mut self, settings: &StoreSettings) -> Result<()> {
        self.settings = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_preserves_insertion_order() {
        let mut store = MemoryRecordStore::new();
        let first = store.create(&NoteRecord::empty(Utc::now())).unwrap();
        let second = store.create(&NoteRecord::empty(Utc::now())).unwrap();
        let third = store.create(&NoteRecord::empty(Utc::now())).unwrap();

        store.delete(&second).unwrap();

        let ids: Vec<NoteId> = store.fetch_all().unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let mut store = MemoryRecordStore::new();
        let missing = NoteId::new();
        let result = store.update(&missing, &NoteRecord::empty(Utc::now()));
        assert!(matches!(result, Err(CypherError::NoteNotFound(id)) if id == missing));
    }

    #[test]
    fn test_pending_changes_cleared_by_flush() {
        let mut store = MemoryRecordStore::new();
        assert!(!store.has_pending_changes());

        store.create(&NoteRecord::empty(Utc::now())).unwrap();
        assert!(store.has_pending_changes());

        store.flush().unwrap();
        assert!(!store.has_pending_changes());
        store.flush().unwrap();
    }

    #[test]
    fn test_delete_unknown_returns_false() {
        let mut store = MemoryRecordStore::new();
        assert!(!store.delete(&NoteId::new()).unwrap());
        assert!(!store.has_pending_changes());
    }
}
