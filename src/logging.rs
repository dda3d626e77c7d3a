//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingSettings};
use crate::{Result, StreamError};

/// Build the filter: `RUST_LOG` when set, otherwise the configured level
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    parse_filter(&settings.level)
}

/// Parse a level or directive string such as `info` or `drishti_stream=debug,axum=warn`
pub fn parse_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level.trim().to_ascii_lowercase())
        .map_err(|e| StreamError::invalid_config("logging.level", e.to_string()))
}

/// Install the global subscriber
///
/// Fails if the level is unparseable or a subscriber is already installed.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let filter = env_filter(settings)?;

    let installed = match settings.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .with_target(true)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .try_init(),
    };

    installed.map_err(|e| StreamError::invalid_config("logging", e.to_string()))
}
