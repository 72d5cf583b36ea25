//! SQLite-backed record store.
//!
//! The database lives in memory while the store is open. `flush` serializes
//! it and atomically replaces the backing file, so a crash between flushes
//! loses only the unflushed mutations and never leaves a torn file behind.
//! Note bodies arrive here already encrypted; titles are stored as given.

mod row;

use std::fs;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use chrono::Utc;
use rusqlite::serialize::OwnedData;
use rusqlite::{params, Connection, DatabaseName, OptionalExtension};
use tracing::{debug, info};

use crate::error::{CypherError, Result};
use crate::fs::{remove_if_exists, write_atomic};
use crate::storage::traits::RecordStore;
use crate::storage::types::{NoteId, NoteRecord};

use row::NoteRow;

/// On-disk layout version, stored in the `meta` table.
pub const FORMAT_VERSION: &str = "1";

const SCHEMA: &str = r#"
    CREATE TABLE meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE notes (
        id TEXT PRIMARY KEY,
        title TEXT,
        body BLOB,
        modified TEXT NOT NULL
    );
"#;

/// Record store persisted as a single SQLite file.
pub struct SqliteRecordStore {
    path: PathBuf,
    conn: Connection,
    dirty: bool,
}

impl SqliteRecordStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `CypherError::Storage` if the file is empty, is not a SQLite
    /// database or carries an unsupported format version.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = if path.exists() {
            Self::load_connection(path)?
        } else {
            Self::fresh_connection()?
        };
        Self::check_format(&conn)?;

        info!(
            component = "record_store",
            op = "open",
            path = %path.display(),
            "opened note database"
        );

        Ok(Self {
            path: path.to_path_buf(),
            conn,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fresh_connection() -> Result<Connection> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)",
            params!["format_version", FORMAT_VERSION],
        )?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)",
            params!["created_at", Utc::now().to_rfc3339()],
        )?;
        Ok(conn)
    }

    fn load_connection(path: &Path) -> Result<Connection> {
        let bytes = fs::read(path).map_err(|e| {
            CypherError::Storage(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut conn = Connection::open_in_memory()?;
        let owned = Self::owned_data_from_bytes(&bytes)?;
        conn.deserialize(DatabaseName::Main, owned, false)?;
        Ok(conn)
    }

    fn check_format(conn: &Connection) -> Result<()> {
        let version: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'format_version'",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| CypherError::Storage(format!("Not a note database: {}", e)))?;

        match version.as_deref() {
            Some(FORMAT_VERSION) => Ok(()),
            Some(other) => Err(CypherError::Storage(format!(
                "Unsupported note database format: {}",
                other
            ))),
            None => Err(CypherError::Storage(
                "Note database has no format version".to_string(),
            )),
        }
    }

    /// Copy `bytes` into a buffer owned by SQLite, as `deserialize` requires.
    fn owned_data_from_bytes(bytes: &[u8]) -> Result<OwnedData> {
        if bytes.is_empty() {
            return Err(CypherError::Storage("Note database file is empty".to_string()));
        }

        let size: i32 = bytes
            .len()
            .try_into()
            .map_err(|_| CypherError::Storage("Note database too large".to_string()))?;

        // SAFETY: sqlite3_malloc returns either null or a writable block of
        // `size` bytes; null is rejected below before any write.
        let raw = unsafe { rusqlite::ffi::sqlite3_malloc(size) as *mut u8 };
        let ptr = NonNull::new(raw)
            .ok_or_else(|| CypherError::Storage("SQLite allocation failed".to_string()))?;

        // SAFETY: `ptr` addresses `bytes.len()` freshly allocated bytes that
        // cannot overlap the borrowed slice. OwnedData takes over the
        // allocation and releases it through SQLite.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
            Ok(OwnedData::from_raw_nonnull(ptr, bytes.len()))
        }
    }
}

impl RecordStore for SqliteRecordStore {
    fn create(&mut self, record: &NoteRecord) -> Result<NoteId> {
        let id = NoteId::new();
        self.conn.execute(
            "INSERT INTO notes (id, title, body, modified) VALUES (?1, ?2, ?3, ?4)",
            params![
                id.to_string(),
                record.title.as_deref(),
                record.body.as_deref(),
                record.modified.to_rfc3339(),
            ],
        )?;
        self.dirty = true;
        debug!(component = "record_store", op = "create", note_id = %id);
        Ok(id)
    }

    fn fetch_all(&self) -> Result<Vec<(NoteId, NoteRecord)>> {
        let sql = format!("SELECT {} FROM notes ORDER BY rowid", NoteRow::COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], NoteRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(NoteRow::into_note).collect()
    }

    fn fetch(&self, id: &NoteId) -> Result<Option<NoteRecord>> {
        let sql = format!("SELECT {} FROM notes WHERE id = ?1", NoteRow::COLUMNS);
        let row = self
            .conn
            .query_row(&sql, [id.to_string()], NoteRow::from_row)
            .optional()?;
        row.map(|row| row.into_note().map(|(_, record)| record))
            .transpose()
    }

    fn update(&mut self, id: &NoteId, record: &NoteRecord) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE notes SET title = ?1, body = ?2, modified = ?3 WHERE id = ?4",
            params![
                record.title.as_deref(),
                record.body.as_deref(),
                record.modified.to_rfc3339(),
                id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(CypherError::NoteNotFound(*id));
        }
        self.dirty = true;
        debug!(component = "record_store", op = "update", note_id = %id);
        Ok(())
    }

    fn delete(&mut self, id: &NoteId) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1", [id.to_string()])?;
        if changed > 0 {
            self.dirty = true;
        }
        debug!(component = "record_store", op = "delete", note_id = %id, found = changed > 0);
        Ok(changed > 0)
    }

    fn destroy_all(&mut self) -> Result<()> {
        // Build the replacement first so a failure leaves everything intact.
        let fresh = Self::fresh_connection()?;
        remove_if_exists(&self.path).map_err(|e| {
            CypherError::Storage(format!("Failed to remove {}: {}", self.path.display(), e))
        })?;
        self.conn = fresh;
        self.dirty = false;
        info!(
            component = "record_store",
            op = "destroy_all",
            path = %self.path.display(),
            "note database destroyed"
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let data = self.conn.serialize(DatabaseName::Main)?;
        write_atomic(&self.path, &data)?;
        self.dirty = false;
        debug!(component = "record_store", op = "flush", bytes = data.len());
        Ok(())
    }

    fn has_pending_changes(&self) -> bool {
        self.dirty
    }
}
