//! Drishti Stream service entry point

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use drishti_stream::server::{self, ServerState, ServiceInfo};
use drishti_stream::sources::{ImageSequenceSource, LoopingSource};
use drishti_stream::{JpegEncoder, Settings, StreamSession, logging};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    settings.apply_env_overrides().context("Invalid environment override")?;
    cli.apply(&mut settings);

    logging::init(&settings.logging).context("Failed to initialise logging")?;

    if let Err(e) = settings.validate() {
        error!("Invalid configuration: {}", e);
        for hint in e.recovery_suggestions() {
            warn!("  - {}", hint);
        }
        return Err(e).context("Invalid configuration");
    }

    match &settings.origin {
        Some(path) => info!(path = %path.display(), "Configuration file loaded"),
        None => warn!("No config file found, using defaults and environment variables"),
    }

    info!(
        stream = %settings.stream.name,
        version = %settings.stream.version,
        "Starting Drishti Stream v{}",
        env!("CARGO_PKG_VERSION")
    );

    let source = match ImageSequenceSource::open(&settings.video.path, settings.video.native_fps) {
        Ok(source) => LoopingSource::new(source, settings.video.looping),
        Err(e) => {
            error!("Cannot open frame source: {}", e);
            for hint in e.recovery_suggestions() {
                warn!("  - {}", hint);
            }
            return Err(e).context("Failed to open frame source");
        }
    };

    let session = StreamSession::start(settings.session_config(), source, JpegEncoder::new())
        .context("Failed to start stream session")?;

    let state = ServerState::new(
        &session,
        ServiceInfo {
            service: settings.stream.name.clone(),
            version: settings.stream.version.clone(),
            stream_path: settings.server.stream_path.clone(),
            description: "Virtual camera streaming paced video frames over WebSocket".to_string(),
        },
    );

    let bind_addr = settings.server.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;

    let stopping = session.stopping_token();
    let server_stop = stopping.clone();
    let server = tokio::spawn(server::serve(listener, server::router(state), async move {
        server_stop.cancelled().await
    }));

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        }
        _ = stopping.cancelled() => info!("Stream session ended"),
    }

    // Cancels the session token, which also stops the HTTP server
    session.shutdown().await;

    server
        .await
        .context("HTTP server task failed")?
        .context("HTTP server error")?;

    info!("Drishti Stream stopped");
    Ok(())
}
