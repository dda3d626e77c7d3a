//! Layered service configuration
//!
//! Values are resolved in this order, later layers winning:
//!
//! 1. Built-in defaults
//! 2. YAML file (`--config`, or the first of [`CONFIG_SEARCH_PATHS`] that exists)
//! 3. Environment variables (`DRISHTI_*`, plus `PORT` for container platforms)
//! 4. Command-line flags, applied by the binary
//!
//! ```yaml
//! stream:
//!   name: drishti-stream-primary
//!   version: v1.0
//! video:
//!   path: ./data/frames
//!   fps: 30          # 0 or "auto" follows the source
//!   loop: true
//!   jpeg_quality: 85
//! server:
//!   port: 8000
//! logging:
//!   level: info
//!   format: json
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::message::{DEFAULT_PROTOCOL_VERSION, DEFAULT_SOURCE_ID, FrameIdMode, StreamIdentity};
use crate::session::{DEFAULT_JPEG_QUALITY, SessionConfig};
use crate::types::{MAX_FPS, MIN_FPS, RateSetting};
use crate::{Result, StreamError};

/// Files tried, in order, when no path is given
pub const CONFIG_SEARCH_PATHS: &[&str] = &["config.yaml", "config.yml", "/app/config.yaml"];

/// Stream identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Human-readable stream name, used in logs and `/`
    pub name: String,
    /// Value of every message's `source` field
    pub source_id: String,
    /// Value of every message's `version` field
    pub version: String,
    pub frame_id_mode: FrameIdMode,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            name: "drishti-stream-primary".to_string(),
            source_id: DEFAULT_SOURCE_ID.to_string(),
            version: DEFAULT_PROTOCOL_VERSION.to_string(),
            frame_id_mode: FrameIdMode::default(),
        }
    }
}

/// Frame source and encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Directory of frames, or a single image
    pub path: PathBuf,
    pub fps: RateSetting,
    /// Rate the frames were captured at
    pub native_fps: f64,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub jpeg_quality: u8,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/frames"),
            fps: RateSetting::default(),
            native_fps: 30.0,
            looping: true,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// HTTP listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// WebSocket endpoint path
    pub stream_path: String,
    pub delivery_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            stream_path: "/ws/stream".to_string(),
            delivery_timeout_ms: 1000,
        }
    }
}

impl ServerSettings {
    /// `host:port` for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }
}

/// Log output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level or `EnvFilter` directive, e.g. `info` or `drishti_stream=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Json }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub stream: StreamSettings,
    pub video: VideoSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,

    /// File the settings were read from, if any
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

impl Settings {
    /// Load from `path`, or search [`CONFIG_SEARCH_PATHS`] when `None`
    ///
    /// An explicit path must exist; a missing search path falls back to defaults
    /// with `origin` left empty. Nothing is logged here because this runs before
    /// the subscriber is installed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_searching(path, CONFIG_SEARCH_PATHS)
    }

    fn load_searching(path: Option<&Path>, search: &[&str]) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match search.iter().map(Path::new).find(|p| p.is_file()) {
                Some(found) => Self::from_file(found),
                None => Ok(Self::default()),
            },
        }
    }

    /// Read and parse one YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| StreamError::file_error(path, e))?;
        let mut settings = Self::from_yaml(&contents, path)?;
        settings.origin = Some(path.to_path_buf());
        Ok(settings)
    }

    /// Parse YAML; `path` is only used for error context
    pub fn from_yaml(contents: &str, path: &Path) -> Result<Self> {
        // An empty file is a valid, all-default config
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(contents)
            .map_err(|source| StreamError::ConfigParse { path: path.to_path_buf(), source })
    }

    /// Apply `DRISHTI_*` and `PORT` from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DRISHTI_VIDEO_PATH") {
            self.video.path = PathBuf::from(path);
        }
        if let Some(fps) = lookup("DRISHTI_FPS") {
            self.video.fps = parse_rate("DRISHTI_FPS", &fps)?;
        }
        if let Some(looping) = lookup("DRISHTI_LOOP") {
            self.video.looping = matches!(looping.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes");
        }
        if let Some(quality) = lookup("DRISHTI_JPEG_QUALITY") {
            self.video.jpeg_quality = parse_number("DRISHTI_JPEG_QUALITY", &quality)?;
        }

        // PORT is set by container platforms and wins over our own variable
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_number("PORT", &port)?;
        } else if let Some(port) = lookup("DRISHTI_PORT") {
            self.server.port = parse_number("DRISHTI_PORT", &port)?;
        }

        if let Some(level) = lookup("DRISHTI_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(version) = lookup("DRISHTI_VERSION") {
            self.stream.version = version;
        }
        Ok(())
    }

    /// Range checks for everything the session and server depend on
    pub fn validate(&self) -> Result<()> {
        self.video.fps.validate()?;

        if !self.video.native_fps.is_finite() || self.video.native_fps <= 0.0 {
            return Err(StreamError::invalid_config(
                "video.native_fps",
                format!("must be positive, got {}", self.video.native_fps),
            ));
        }
        if !(1..=100).contains(&self.video.jpeg_quality) {
            return Err(StreamError::invalid_config(
                "video.jpeg_quality",
                format!("{} is outside 1-100", self.video.jpeg_quality),
            ));
        }
        if self.video.path.as_os_str().is_empty() {
            return Err(StreamError::invalid_config("video.path", "must not be empty"));
        }
        if self.server.port == 0 {
            return Err(StreamError::invalid_config("server.port", "must be 1-65535"));
        }
        if !self.server.stream_path.starts_with('/') {
            return Err(StreamError::invalid_config(
                "server.stream_path",
                format!("'{}' must start with '/'", self.server.stream_path),
            ));
        }
        if self.server.delivery_timeout_ms == 0 {
            return Err(StreamError::invalid_config("server.delivery_timeout_ms", "must be positive"));
        }
        if self.stream.source_id.is_empty() || self.stream.version.is_empty() {
            return Err(StreamError::invalid_config("stream", "source_id and version must not be empty"));
        }
        Ok(())
    }

    /// Session parameters derived from these settings
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            rate: self.video.fps,
            jpeg_quality: self.video.jpeg_quality,
            identity: StreamIdentity {
                source: self.stream.source_id.clone(),
                version: self.stream.version.clone(),
            },
            frame_id_mode: self.stream.frame_id_mode,
            delivery_timeout: self.server.delivery_timeout(),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| StreamError::invalid_config(key, format!("'{value}' is not a valid number")))
}

fn parse_rate(key: &str, value: &str) -> Result<RateSetting> {
    if value.trim().eq_ignore_ascii_case("auto") {
        return Ok(RateSetting::Auto);
    }
    let fps: u32 = parse_number(key, value)?;
    if fps > MAX_FPS {
        return Err(StreamError::invalid_config(key, format!("{fps} is outside {MIN_FPS}-{MAX_FPS}")));
    }
    Ok(RateSetting::from_fps(fps))
}
