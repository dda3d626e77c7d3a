//! Error types for the frame pacing and broadcast engine.
//!
//! All errors implement `std::error::Error` and carry enough context to be
//! logged with no further wrapping. Each error also belongs to one category of the
//! failure taxonomy, which decides how far it is allowed to propagate:
//!
//! - **Startup**: the session refuses to start (bad rate, unreadable or empty source,
//!   invalid configuration). These are the only errors returned to the operator.
//! - **Tick**: a single frame could not be read or encoded. The tick is skipped and
//!   pacing continues on its original schedule.
//! - **Subscriber**: a single delivery failed or timed out. That subscriber is evicted;
//!   nobody else notices.
//! - **Shutdown**: the session has already stopped.
//!
//! ```rust
//! use drishti_stream::{Severity, StreamError};
//!
//! let error = StreamError::InvalidRate { configured: 60, native: 30.0 };
//! assert!(error.is_fatal_at_startup());
//! assert_eq!(error.severity(), Severity::Startup);
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for streaming operations.
pub type Result<T, E = StreamError> = std::result::Result<T, E>;

/// How far an error is allowed to propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Aborts session startup entirely.
    Startup,
    /// Skips one tick; pacing continues.
    Tick,
    /// Evicts one subscriber; the tick and all other subscribers are unaffected.
    Subscriber,
    /// Expected control signal during teardown.
    Shutdown,
}

/// Main error type for streaming operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StreamError {
    #[error(
        "Configured rate {configured} fps exceeds the source's native rate of {native} fps; frames would have to be duplicated"
    )]
    InvalidRate { configured: u32, native: f64 },

    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Failed to parse configuration file {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Cannot open frame source {path}: {reason}")]
    SourceOpen { path: PathBuf, reason: String },

    #[error("Frame source {path} contains no frames")]
    EmptySource { path: PathBuf },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode frame at position {position}: {reason}")]
    Decode { position: u64, reason: String },

    #[error("Failed to encode frame: {reason}")]
    Encode { reason: String },

    #[error("Delivery to subscriber {subscriber} failed: {reason}")]
    Delivery { subscriber: u64, reason: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Failed to serialize frame message")]
    Serialization(#[from] serde_json::Error),

    #[error("Streaming session has shut down")]
    Shutdown,
}

impl StreamError {
    /// Returns the taxonomy category of this error.
    pub fn severity(&self) -> Severity {
        match self {
            StreamError::InvalidRate { .. }
            | StreamError::InvalidConfig { .. }
            | StreamError::ConfigParse { .. }
            | StreamError::SourceOpen { .. }
            | StreamError::EmptySource { .. }
            | StreamError::File { .. } => Severity::Startup,
            StreamError::Decode { .. }
            | StreamError::Encode { .. }
            | StreamError::Serialization(_) => Severity::Tick,
            StreamError::Delivery { .. } | StreamError::Timeout { .. } => Severity::Subscriber,
            StreamError::Shutdown => Severity::Shutdown,
        }
    }

    /// Returns whether this error must abort session startup.
    pub fn is_fatal_at_startup(&self) -> bool {
        self.severity() == Severity::Startup
    }

    /// Returns suggested operator actions for startup failures.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            StreamError::InvalidRate { .. } => vec![
                "Lower video.fps to the source's native rate or below",
                "Set video.fps to 0 or \"auto\" to follow the native rate",
            ],
            StreamError::InvalidConfig { .. } | StreamError::ConfigParse { .. } => vec![
                "Check config.yaml against the documented ranges",
                "Check DRISHTI_* environment overrides",
            ],
            StreamError::SourceOpen { .. } | StreamError::File { .. } => vec![
                "Check the video path exists and is readable",
                "Remote object storage must be fetched to a local path first",
            ],
            StreamError::EmptySource { .. } => {
                vec!["Add frames (png, jpg, bmp) to the source directory"]
            }
            _ => Vec::new(),
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StreamError::File { path: path.into(), source }
    }

    /// Helper constructor for configuration range errors.
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        StreamError::InvalidConfig { field: field.into(), reason: reason.into() }
    }

    /// Helper constructor for source open failures.
    pub fn source_open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StreamError::SourceOpen { path: path.into(), reason: reason.into() }
    }

    /// Helper constructor for per-frame decode failures.
    pub fn decode(position: u64, reason: impl Into<String>) -> Self {
        StreamError::Decode { position, reason: reason.into() }
    }

    /// Helper constructor for encode failures.
    pub fn encode(reason: impl Into<String>) -> Self {
        StreamError::Encode { reason: reason.into() }
    }

    /// Helper constructor for delivery failures.
    pub fn delivery(subscriber: u64, reason: impl Into<String>) -> Self {
        StreamError::Delivery { subscriber, reason: reason.into() }
    }
}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        StreamError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}
