//! Catalog loading: tower levels, enemy stat sheets, and level paths are
//! plain JSON data deserialized at startup.

use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while loading simulation data. All of them are recoverable:
/// callers log and continue with whatever catalogs did load.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown tower type `{0}`")]
    UnknownTowerType(String),
}

/// Parse a catalog from a JSON string.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a catalog from a JSON file on disk.
pub fn load_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    from_json(&text)
}
