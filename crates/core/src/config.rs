//! Configuration management for SubtleCaps.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverPolicy,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Restrictions applied on top of the built-in capability matrix.
///
/// A policy can only narrow what the resolver reports as supported. The
/// defaults reproduce the unrestricted matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverPolicy {
    /// Report SHA-1 digests and SHA-1 hash parameters as supported
    pub allow_sha1: bool,
    /// Lowest accepted PBKDF2 iteration count (never below 1)
    pub min_pbkdf2_iterations: u32,
    /// Lowest accepted RSA `modulusLength` for key generation
    pub min_rsa_modulus_length: u32,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            allow_sha1: true,
            min_pbkdf2_iterations: 1,
            min_rsa_modulus_length: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Config {
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// Rejects values that would widen the capability matrix.
    pub fn validate(&self) -> Result<()> {
        if self.resolver.min_pbkdf2_iterations == 0 {
            return Err(CoreError::InvalidConfig {
                field: "resolver.min_pbkdf2_iterations".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.logging.level.trim().is_empty() {
            return Err(CoreError::InvalidConfig {
                field: "logging.level".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
