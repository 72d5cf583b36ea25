//! Storage boundaries consumed by the note store.
//!
//! `RecordStore` is the durable collection of note records and
//! `SettingsStore` holds the small key-value state kept outside it.
//! Backends are free to choose their medium as long as every operation is
//! atomic from the caller's point of view.

use super::types::{NoteId, NoteRecord, StoreSettings};
use crate::error::Result;

/// Durable collection of note records.
///
/// Implementations must ensure:
/// - Handles are stable for the lifetime of a record
/// - `fetch_all` returns records in storage (insertion) order
/// - Mutations become durable no later than the next `flush`
pub trait RecordStore: Send {
    /// Insert a record and return its new handle.
    fn create(&mut self, record: &NoteRecord) -> Result<NoteId>;

    /// Every record, in storage order.
    fn fetch_all(&self) -> Result<Vec<(NoteId, NoteRecord)>>;

    /// Get a record by handle.
    ///
    /// Returns `Ok(None)` if the handle is unknown.
    fn fetch(&self, id: &NoteId) -> Result<Option<NoteRecord>>;

    /// Replace a record.
    ///
    /// # Errors
    ///
    /// Returns `CypherError::NoteNotFound` if the handle is unknown.
    fn update(&mut self, id: &NoteId, record: &NoteRecord) -> Result<()>;

    /// Remove a record.
    ///
    /// Returns `Ok(false)` if the handle was unknown.
    fn delete(&mut self, id: &NoteId) -> Result<bool>;

    /// Irreversibly remove every record and the backing storage.
    ///
    /// The store stays usable afterwards, empty.
    fn destroy_all(&mut self) -> Result<()>;

    /// Commit pending changes to durable storage.
    ///
    /// A no-op when nothing is pending.
    fn flush(&mut self) -> Result<()>;

    /// Whether mutations have been made since the last flush.
    fn has_pending_changes(&self) -> bool;
}

/// Key-value settings kept outside the record store.
pub trait SettingsStore: Send {
    /// Current settings; defaults when nothing has been saved.
    fn load(&self) -> Result<StoreSettings>;

    /// Replace all settings in one atomic write.
    ///
    /// Saving empty settings clears the store.
    fn save(&mut self, settings: &StoreSettings) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traits_are_object_safe() {
        fn _accepts_records(_store: Box<dyn RecordStore>) {}
        fn _accepts_settings(_store: Box<dyn SettingsStore>) {}
    }
}
