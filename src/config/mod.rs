// src/config/mod.rs

//! Configuration loading and validation for kitchenbot.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`), falling back to the built-in
//!   configuration (`defaults.rs`).
//! - Validate it into a [`ConfigFile`] (`validate.rs`).

pub mod defaults;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{builtin, default_config_path, load_and_validate, load_config, load_from_path, parse_str};
pub use model::{ConfigFile, DeviceSettings, RawConfigFile};
