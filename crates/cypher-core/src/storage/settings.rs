//! JSON settings file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CypherError, Result};
use crate::fs::{remove_if_exists, write_atomic};
use crate::storage::traits::SettingsStore;
use crate::storage::types::StoreSettings;

/// Settings persisted as a small JSON document.
///
/// Every save replaces the whole file atomically, so the initialized flag
/// and the canary can never be observed out of step. Saving empty settings
/// removes the file.
#[derive(Debug)]
pub struct JsonSettingsFile {
    path: PathBuf,
}

impl JsonSettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsFile {
    fn load(&self) -> Result<StoreSettings> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(StoreSettings::default())
            }
            Err(err) => {
                return Err(CypherError::Storage(format!(
                    "Failed to read settings {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };
        Ok(serde_json::from_slice(&contents)?)
    }

    fn save(&mut self, settings: &StoreSettings) -> Result<()> {
        if settings.is_empty() {
            let removed = remove_if_exists(&self.path).map_err(|e| {
                CypherError::Storage(format!(
                    "Failed to remove settings {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
            debug!(component = "settings", op = "clear", removed, "settings cleared");
            return Ok(());
        }

        let contents = serde_json::to_vec_pretty(settings)?;
        write_atomic(&self.path, &contents)?;
        debug!(component = "settings", op = "save", "settings written");
        Ok(())
    }
}
