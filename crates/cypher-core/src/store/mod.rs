//! The note store facade.
//!
//! `NoteStore` composes the cipher, the password validator and a record
//! store into the operations an application uses: unlock, list, create,
//! read, write, delete and destroy.
//!
//! ## Consistency
//!
//! The index is rebuilt from the record store after every mutation. Record
//! store changes become durable at checkpoints: `encrypt_and_store`,
//! `store_note`, `flush`, `lock` and `on_suspend`. A commit that fails leaves
//! the change in the working set and the index, and the next checkpoint
//! retries it.
//!
//! Anything that encrypts or decrypts pays one password key derivation, about
//! a second (see [`crate::crypto::cipher`]).
//!
//! ## Failure policy
//!
//! - Wrong password at unlock: `CypherError::WrongPassword`, data untouched
//! - Undecryptable body at read time: logged, returned as `""`
//! - Storage failures: propagated; the caller should end the session

mod index;
mod session;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::CypherConfig;
use crate::crypto::cipher::{decrypt, encrypt};
use crate::crypto::validator::{PasswordValidator, Validation};
use crate::error::{CypherError, Result};
use crate::lifecycle::Suspendable;
use crate::storage::settings::JsonSettingsFile;
use crate::storage::sqlite::SqliteRecordStore;
use crate::storage::traits::{RecordStore, SettingsStore};
use crate::storage::types::{NoteId, NoteRecord, NoteSummary};

pub use index::NoteIndex;

use session::{Draft, Session};

/// Whole-store state as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// No password has been chosen yet.
    Uninitialized,
    /// A password exists but no session is open.
    Locked,
    /// A session is open and notes are accessible.
    Unlocked,
}

/// Encrypted note store.
///
/// Single owner, sequential access: no internal locking is performed.
#[derive(Debug)]
pub struct NoteStore<R: RecordStore, S: SettingsStore> {
    records: R,
    validator: PasswordValidator<S>,
    session: Option<Session>,
    draft: Option<Draft>,
    index: NoteIndex,
}

impl NoteStore<SqliteRecordStore, JsonSettingsFile> {
    /// Open the on-disk store described by `config`, locked.
    pub fn open(config: &CypherConfig) -> Result<Self> {
        let records = SqliteRecordStore::open(&config.storage.notes_path)?;
        let settings = JsonSettingsFile::new(&config.storage.settings_path);
        Ok(Self::new(records, settings))
    }
}

impl<R: RecordStore, S: SettingsStore> NoteStore<R, S> {
    /// Compose a store from its backends. The store starts locked.
    pub fn new(records: R, settings: S) -> Self {
        Self {
            records,
            validator: PasswordValidator::new(settings),
            session: None,
            draft: None,
            index: NoteIndex::new(),
        }
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    pub fn validator(&self) -> &PasswordValidator<S> {
        &self.validator
    }

    pub fn state(&self) -> Result<StoreState> {
        if self.session.is_some() {
            Ok(StoreState::Unlocked)
        } else if self.validator.is_initialized()? {
            Ok(StoreState::Locked)
        } else {
            Ok(StoreState::Uninitialized)
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_some()
    }

    /// When the current session was opened.
    pub fn unlocked_at(&self) -> Option<DateTime<Utc>> {
        self.session.as_ref().map(Session::unlocked_at)
    }

    /// Open a session with `password`.
    ///
    /// On an uninitialized store the password is adopted. Any session that
    /// is already open is locked first, so each attempt stands on its own.
    ///
    /// # Errors
    ///
    /// Returns `CypherError::WrongPassword` if the password does not match;
    /// the store is then locked and no data has been touched.
    pub fn unlock(&mut self, password: &str) -> Result<Validation> {
        if self.session.is_some() {
            self.lock()?;
        }

        let outcome = self.validator.validate_or_initialize(password)?;
        self.index.rebuild(&self.records)?;
        self.session = Some(Session::new(password));

        info!(
            component = "note_store",
            op = "unlock",
            outcome = ?outcome,
            notes = self.index.len(),
            "store unlocked"
        );
        Ok(outcome)
    }

    /// Persist pending work and close the session.
    ///
    /// The password is zeroized when the session drops. If persisting fails
    /// the session stays open so the caller can retry.
    pub fn lock(&mut self) -> Result<()> {
        self.flush()?;
        self.session = None;
        self.draft = None;
        self.index.clear();
        info!(component = "note_store", op = "lock", "store locked");
        Ok(())
    }

    /// Cached index, in storage order. Empty while locked.
    pub fn list(&self) -> &[NoteSummary] {
        self.index.entries()
    }

    /// Number of notes in the cached index. Zero while locked.
    pub fn count(&self) -> usize {
        self.index.len()
    }

    /// Summary at `position` in the cached index.
    pub fn note_at(&self, position: usize) -> Option<&NoteSummary> {
        self.index.get(position)
    }

    /// Create an untitled note with no body.
    pub fn new_note(&mut self) -> Result<NoteId> {
        self.require_session()?;
        let id = self.records.create(&NoteRecord::empty(Utc::now()))?;
        self.index.rebuild(&self.records)?;
        debug!(component = "note_store", op = "new_note", note_id = %id);
        Ok(id)
    }

    /// Delete a note.
    ///
    /// Returns `Ok(false)` for an unknown handle; the index is unaffected.
    pub fn delete_note(&mut self, id: &NoteId) -> Result<bool> {
        self.require_session()?;
        let deleted = self.records.delete(id)?;
        if self.draft.as_ref().is_some_and(|draft| &draft.id == id) {
            self.draft = None;
        }
        self.index.rebuild(&self.records)?;
        debug!(component = "note_store", op = "delete_note", note_id = %id, deleted);
        Ok(deleted)
    }

    /// Title of a note, empty when it has none.
    pub fn get_title(&self, id: &NoteId) -> Result<String> {
        self.require_session()?;
        let record = self.fetch_existing(id)?;
        Ok(record.title.unwrap_or_default())
    }

    pub fn set_title(&mut self, id: &NoteId, title: &str) -> Result<()> {
        self.require_session()?;
        let mut record = self.fetch_existing(id)?;
        record.title = Some(title.to_string());
        record.modified = Utc::now();
        self.records.update(id, &record)?;
        self.index.rebuild(&self.records)?;
        Ok(())
    }

    /// Decrypted body of a note.
    ///
    /// A missing body, a body that does not authenticate under the current
    /// password, or one that is not UTF-8 all yield `""`. Only a locked
    /// store, an unknown handle or a storage failure are errors.
    pub fn decrypt_body(&self, id: &NoteId) -> Result<String> {
        let session = self.require_session()?;
        let record = self.fetch_existing(id)?;

        let Some(body) = record.body else {
            return Ok(String::new());
        };

        let plaintext = match decrypt(&body, session.password()) {
            Ok(plaintext) => plaintext,
            Err(err) => {
                warn!(
                    component = "note_store",
                    op = "decrypt_body",
                    note_id = %id,
                    error = %err,
                    "body not readable under current password; showing empty"
                );
                return Ok(String::new());
            }
        };

        match std::str::from_utf8(&plaintext) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => {
                warn!(
                    component = "note_store",
                    op = "decrypt_body",
                    note_id = %id,
                    "body is not valid UTF-8; showing empty"
                );
                Ok(String::new())
            }
        }
    }

    /// Encrypt `plaintext` as the note's body and commit it.
    pub fn encrypt_and_store(&mut self, id: &NoteId, plaintext: &str) -> Result<()> {
        self.write_body(id, plaintext)?;
        if self.draft.as_ref().is_some_and(|draft| &draft.id == id) {
            self.draft = None;
        }
        self.index.rebuild(&self.records)?;
        self.records.flush()
    }

    /// Touch a note's modification time and commit the record store.
    pub fn store_note(&mut self, id: &NoteId) -> Result<()> {
        self.require_session()?;
        let mut record = self.fetch_existing(id)?;
        record.modified = Utc::now();
        self.records.update(id, &record)?;
        self.index.rebuild(&self.records)?;
        self.records.flush()
    }

    /// Remember the editor's current text for `id`.
    ///
    /// Nothing is encrypted yet; the text is written on the next `flush`,
    /// `lock` or suspend. A later call replaces the previous draft.
    pub fn stage_edit(&mut self, id: &NoteId, text: &str) -> Result<()> {
        self.require_session()?;
        if !self.index.contains(id) {
            return Err(CypherError::NoteNotFound(*id));
        }
        self.draft = Some(Draft::new(*id, text));
        Ok(())
    }

    /// Forget the staged draft without writing it.
    pub fn discard_edit(&mut self) {
        self.draft = None;
    }

    pub fn has_staged_edit(&self) -> bool {
        self.draft.is_some()
    }

    /// Write any staged draft, then commit the record store.
    ///
    /// Safe to call with nothing pending.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(draft) = self.draft.take() {
            match self.write_body(&draft.id, &draft.text) {
                Ok(()) => {}
                Err(CypherError::NoteNotFound(id)) => {
                    warn!(
                        component = "note_store",
                        op = "flush",
                        note_id = %id,
                        "dropping draft for a note that no longer exists"
                    );
                }
                Err(err) => {
                    self.draft = Some(draft);
                    return Err(err);
                }
            }
        }

        if self.session.is_some() {
            self.index.rebuild(&self.records)?;
        }
        let pending = self.records.has_pending_changes();
        self.records.flush()?;
        debug!(component = "note_store", op = "flush", pending);
        Ok(())
    }

    /// Remove every note and the canary, returning to `Uninitialized`.
    ///
    /// Works whether or not the store is unlocked. Settings are cleared
    /// first and restored if the record store cannot be destroyed, so notes
    /// and canary always disappear together.
    ///
    /// # Errors
    ///
    /// Returns the record store error after a successful rollback, or
    /// `CypherError::DestroyIncomplete` if the rollback failed too.
    pub fn destroy(&mut self) -> Result<()> {
        let snapshot = self.validator.snapshot()?;
        self.validator.reset()?;

        if let Err(err) = self.records.destroy_all() {
            warn!(
                component = "note_store",
                op = "destroy",
                error = %err,
                "record store destroy failed; restoring settings"
            );
            return match self.validator.restore(&snapshot) {
                Ok(()) => Err(err),
                Err(restore_err) => Err(CypherError::DestroyIncomplete(format!(
                    "destroy: {}; restore: {}",
                    err, restore_err
                ))),
            };
        }

        self.session = None;
        self.draft = None;
        self.index.clear();
        info!(component = "note_store", op = "destroy", "store destroyed");
        Ok(())
    }

    fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(CypherError::Locked)
    }

    fn fetch_existing(&self, id: &NoteId) -> Result<NoteRecord> {
        self.records
            .fetch(id)?
            .ok_or(CypherError::NoteNotFound(*id))
    }

    fn write_body(&mut self, id: &NoteId, plaintext: &str) -> Result<()> {
        let ciphertext = {
            let session = self.require_session()?;
            encrypt(plaintext.as_bytes(), session.password())?
        };
        let mut record = self.fetch_existing(id)?;
        record.body = Some(ciphertext);
        record.modified = Utc::now();
        self.records.update(id, &record)?;
        debug!(component = "note_store", op = "write_body", note_id = %id);
        Ok(())
    }
}

impl<R: RecordStore, S: SettingsStore> Suspendable for NoteStore<R, S> {
    fn on_suspend(&mut self) -> Result<()> {
        self.flush()
    }
}
