//! Store configuration.
//!
//! A small TOML file naming where notes and settings live, plus the
//! password policy the application should apply before first unlock.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::password::{PasswordPolicy, DEFAULT_MIN_PASSWORD_LENGTH};
use crate::error::{CypherError, Result};
use crate::fs::write_atomic;

const APP_DIR: &str = "cypher-notes";
const NOTES_FILE: &str = "notes.sqlite";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CypherConfig {
    pub storage: StorageSection,
    #[serde(default)]
    pub security: SecuritySection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSection {
    pub notes_path: PathBuf,
    pub settings_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySection {
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

fn default_min_password_length() -> usize {
    DEFAULT_MIN_PASSWORD_LENGTH
}

impl CypherConfig {
    /// Configuration keeping both files inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            storage: StorageSection {
                notes_path: data_dir.join(NOTES_FILE),
                settings_path: data_dir.join(SETTINGS_FILE),
            },
            security: SecuritySection::default(),
        }
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy::new(self.security.min_password_length)
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_data_dir() -> Result<PathBuf> {
    resolve_xdg_dir(
        std::env::var("XDG_DATA_HOME").ok(),
        std::env::var("HOME").ok(),
        &[".local", "share"],
    )
}

pub fn read_config(path: &Path) -> Result<CypherConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CypherError::Config(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    toml::from_str(&contents).map_err(|e| {
        CypherError::Config(format!("Failed to parse config {}: {}", path.display(), e))
    })
}

pub fn write_config(path: &Path, config: &CypherConfig) -> Result<()> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| CypherError::Config(format!("TOML error: {}", e)))?;
    write_atomic(path, contents.as_bytes())
}

/// Read the config at `path`, or fall back to the XDG data directory when
/// no file exists.
pub fn load_or_default(path: &Path) -> Result<CypherConfig> {
    if path.exists() {
        read_config(path)
    } else {
        Ok(CypherConfig::new(&default_data_dir()?))
    }
}

fn xdg_config_dir() -> Result<PathBuf> {
    resolve_xdg_dir(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
        &[".config"],
    )
}

fn resolve_xdg_dir(
    xdg_value: Option<String>,
    home: Option<String>,
    home_fallback: &[&str],
) -> Result<PathBuf> {
    if let Some(value) = xdg_value {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    let home = home.filter(|value| !value.trim().is_empty()).ok_or_else(|| {
        CypherError::Config("HOME is not set; cannot resolve default paths".to_string())
    })?;
    let mut dir = PathBuf::from(home);
    for part in home_fallback {
        dir.push(part);
    }
    Ok(dir.join(APP_DIR))
}
