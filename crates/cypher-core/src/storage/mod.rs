//! Storage boundaries and backends.
//!
//! The note store depends only on the `RecordStore` and `SettingsStore`
//! traits:
//! - `SqliteRecordStore` + `JsonSettingsFile`: durable, on-disk
//! - `MemoryRecordStore` + `MemorySettings`: in-process only
//!
//! Bodies reach the record store already encrypted; nothing at this layer
//! ever sees a password or plaintext.

pub mod memory;
pub mod settings;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export public types
pub use memory::{MemoryRecordStore, MemorySettings};
pub use settings::JsonSettingsFile;
pub use sqlite::SqliteRecordStore;
pub use traits::{RecordStore, SettingsStore};
pub use types::{NoteId, NoteRecord, NoteSummary, StoreSettings};
