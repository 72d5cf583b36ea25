//! In-memory note index.

use crate::error::Result;
use crate::storage::traits::RecordStore;
use crate::storage::types::{NoteId, NoteSummary};

/// Ordered cache of note summaries mirroring the record store.
///
/// Never patched in place: every mutation is followed by a full `rebuild`,
/// so the cache cannot drift from durable storage. A failed rebuild leaves
/// the index empty rather than stale.
#[derive(Debug, Default)]
pub struct NoteIndex {
    entries: Vec<NoteSummary>,
}

impl NoteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild<R: RecordStore + ?Sized>(&mut self, records: &R) -> Result<()> {
        self.entries.clear();
        self.entries = records
            .fetch_all()?
            .iter()
            .map(|(id, record)| NoteSummary::from_record(*id, record))
            .collect();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[NoteSummary] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NoteSummary> {
        self.entries.get(index)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.entries.iter().any(|entry| &entry.id == id)
    }
}
