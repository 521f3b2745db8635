//! Core error types

use thiserror::Error;

/// Core error type for SubtleCaps
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for [`crate::Config`]
    #[cfg(feature = "toml")]
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds an unusable value
    #[error("Invalid config value '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    /// A global tracing subscriber was already installed
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
