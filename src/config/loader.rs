// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file and return the raw command list.
///
/// This only performs JSON deserialization; command types are **not**
/// checked. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawConfigFile = serde_json::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file and validate every entry.
///
/// An unknown `type` anywhere in the file fails here, before any command
/// has been started.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw = load_from_path(path)?;
    ConfigFile::try_from(raw)
}

/// Same as [`load_and_validate`] for an in-memory JSON document.
pub fn parse_and_validate(json: &str) -> Result<ConfigFile> {
    let raw: RawConfigFile = serde_json::from_str(json)?;
    ConfigFile::try_from(raw)
}

/// `paircheck.json` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("paircheck.json")
}
