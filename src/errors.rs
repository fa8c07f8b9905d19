// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KitchenError {
    /// An execution or mode change was attempted while the device is off.
    #[error("Device is not powered on")]
    DeviceNotPowered,

    /// The requested transition is illegal in the current device state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A recipe step names an operation the task factory cannot build.
    #[error("Recipe incompatible: unknown operation '{operation}'")]
    RecipeIncompatible { operation: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KitchenError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        KitchenError::InvalidOperation(reason.into())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, KitchenError>;
