//! Core functionality for the SubtleCaps capability resolver.
//!
//! This crate provides the configuration, error and logging plumbing shared
//! across the SubtleCaps workspace.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, LogFormat, LoggingConfig, ResolverPolicy};
pub use error::{CoreError, Result};
