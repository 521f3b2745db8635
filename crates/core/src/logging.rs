//! Structured logging infrastructure for SubtleCaps.
//!
//! [`init_with`] is the single entry point: it installs a `tracing`
//! subscriber writing human-readable or JSON lines to stderr, filtered by
//! `RUST_LOG` or, when unset, by the configured level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{CoreError, Result};

fn filter_or(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize logging from a [`LoggingConfig`].
///
/// `RUST_LOG` still wins over `config.level`. Returns an error instead of
/// panicking when a subscriber is already installed.
///
/// # Example
/// ```no_run
/// use subtlecaps_core::{logging, LogFormat, LoggingConfig};
///
/// let config = LoggingConfig {
///     level: "debug".to_string(),
///     format: LogFormat::Json,
/// };
/// logging::init_with(&config).expect("no subscriber installed yet");
/// tracing::info!(service = "subtlecaps", "Service started");
/// ```
pub fn init_with(config: &LoggingConfig) -> Result<()> {
    let filter = filter_or(&config.level);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| CoreError::Logging(e.to_string()))
}
