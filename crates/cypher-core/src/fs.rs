//! Filesystem utilities for atomic writes.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CypherError, Result};

/// Replace `path` with `data` so readers see either the old or the new file.
///
/// Writes a sibling temp file, syncs it, then renames it over the target.
/// Missing parent directories are created.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| CypherError::Storage(format!("Invalid path: {}", path.display())))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent).map_err(|e| {
            CypherError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| CypherError::Storage(format!("System time error: {}", e)))?
        .as_nanos();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CypherError::Storage(format!("Invalid filename: {}", path.display())))?;
    let temp_path = parent.join(format!(".{}.{}.tmp", filename, nanos));

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| CypherError::Storage(format!("Temp file create failed: {}", e)))?;
    let written = file.write_all(data).and_then(|_| file.sync_all());
    drop(file);
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(CypherError::Storage(format!("Temp file write failed: {}", e)));
    }

    rename_with_fallback(&temp_path, path)
        .map_err(|e| CypherError::Storage(format!("Atomic rename failed: {}", e)))
}

/// Remove a file, treating an already-missing file as success.
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Rename a file, retrying after removing the destination on platforms where
/// rename refuses to overwrite. The temp file is cleaned up on failure.
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!("initial: {}, retry: {}", initial_err, retry_err),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("nested").join("notes.sqlite");

        write_atomic(&dest, b"payload").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"payload");
    }

    #[test]
    fn test_write_atomic_overwrites_existing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("settings.json");
        fs::write(&dest, b"old").unwrap();

        write_atomic(&dest, b"new").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_remove_if_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        assert!(!remove_if_exists(&path).unwrap());

        fs::write(&path, b"x").unwrap();
        assert!(remove_if_exists(&path).unwrap());
        assert!(!path.exists());
    }
}
