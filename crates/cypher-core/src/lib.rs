//! # Cypher Core
//!
//! Encrypted note store for a local, single-user note-taking application.
//!
//! Note bodies are encrypted at rest under a password that is never
//! persisted. The first password presented to a new store is adopted, and a
//! canary encrypted under it validates every later unlock.
//!
//! ## Architecture
//!
//! - **crypto**: authenticated password-based cipher, canary validator,
//!   password policy
//! - **storage**: record store and settings boundaries with SQLite, JSON
//!   file and in-memory backends
//! - **store**: the `NoteStore` facade and its in-memory index
//! - **lifecycle**: suspend/terminate hook for the host application
//! - **config**: TOML configuration and default paths
//!
//! ## Example
//!
//! ```
//! use cypher_core::storage::{MemoryRecordStore, MemorySettings};
//! use cypher_core::NoteStore;
//!
//! let mut store = NoteStore::new(MemoryRecordStore::new(), MemorySettings::new());
//! store.unlock("hunter22").unwrap();
//!
//! let id = store.new_note().unwrap();
//! store.encrypt_and_store(&id, "buy milk").unwrap();
//! assert_eq!(store.decrypt_body(&id).unwrap(), "buy milk");
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod lifecycle;
pub mod storage;
pub mod store;

pub use config::CypherConfig;
pub use error::{CypherError, Result};
pub use lifecycle::{dispatch, AppEvent, Suspendable};
pub use storage::{NoteId, NoteSummary, RecordStore, SettingsStore};
pub use store::{NoteStore, StoreState};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
