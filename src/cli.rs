use std::path::PathBuf;

use clap::Parser;

use drishti_stream::Settings;
use drishti_stream::types::RateSetting;

/// Virtual camera: streams a frame source over WebSocket at a fixed rate
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// YAML config file; searched in the working directory when omitted
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Log level or filter directive
    #[arg(long, value_name = "LOG_LEVEL")]
    pub(crate) log_level: Option<String>,

    /// HTTP port
    #[arg(long, value_name = "PORT")]
    pub(crate) port: Option<u16>,

    /// Frame directory or image
    #[arg(long, value_name = "PATH")]
    pub(crate) video: Option<PathBuf>,

    /// Emission rate; 0 follows the source
    #[arg(long, value_name = "FPS")]
    pub(crate) fps: Option<u32>,

    /// Stop at the end of the source instead of looping
    #[arg(long)]
    pub(crate) no_loop: bool,
}

impl Cli {
    /// Flags win over every other configuration layer
    pub(crate) fn apply(&self, settings: &mut Settings) {
        if let Some(level) = &self.log_level {
            settings.logging.level = level.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(video) = &self.video {
            settings.video.path = video.clone();
        }
        if let Some(fps) = self.fps {
            settings.video.fps = RateSetting::from_fps(fps);
        }
        if self.no_loop {
            settings.video.looping = false;
        }
    }
}
