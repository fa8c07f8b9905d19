// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::defaults::BUILTIN_CONFIG;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to get
/// a checked [`ConfigFile`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Parse and validate configuration held in memory.
pub fn parse_str(contents: &str) -> Result<ConfigFile> {
    let raw_config: RawConfigFile = toml::from_str(contents)?;
    ConfigFile::try_from(raw_config)
}

/// The configuration compiled into the binary.
pub fn builtin() -> Result<ConfigFile> {
    parse_str(BUILTIN_CONFIG)
}

/// Resolve the configuration the binary should use.
///
/// An explicit path must exist. Without one, `Kitchenbot.toml` in the
/// working directory is used if present, else the built-in configuration.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            load_and_validate(path)
        }
        None => {
            let path = default_config_path();
            if path.exists() {
                info!(path = %path.display(), "loading config");
                load_and_validate(&path)
            } else {
                debug!(path = %path.display(), "no config file; using built-in defaults");
                builtin()
            }
        }
    }
}

/// Default config location: `Kitchenbot.toml` in the current working
/// directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Kitchenbot.toml")
}
