//! Virtual camera engine: wall-clock paced frame broadcasting.
//!
//! Drishti Stream reads frames from a source, re-times them to a fixed rate
//! anchored to wall-clock time, and pushes each one to every connected subscriber
//! as a self-describing JSON message. Consumers see what looks like a live camera.
//!
//! # Architecture
//!
//! ```text
//!   FrameSource ─► Pacer ─► FrameEncoder ─► FrameMessage ─► Broadcaster ─► SubscriberSink*
//!   (decode)       (slot)    (JPEG)         (JSON)          (fan-out)      (WebSocket)
//! ```
//!
//! - **Pacing**: slot `n` is due at `anchor + n / fps`; a slow tick never shifts later ones.
//! - **Isolation**: each delivery has its own timeout; failing subscribers are evicted alone.
//! - **Failure taxonomy**: only startup errors reach the caller; per-tick and
//!   per-subscriber failures are logged and absorbed.
//!
//! # Example
//!
//! ```rust,no_run
//! use drishti_stream::sources::{ImageSequenceSource, LoopingSource};
//! use drishti_stream::{JpegEncoder, SessionConfig, StreamSession};
//!
//! #[tokio::main]
//! async fn main() -> drishti_stream::Result<()> {
//!     let source = LoopingSource::new(ImageSequenceSource::open("./data/frames", 30.0)?, true);
//!     let session = StreamSession::start(SessionConfig::default(), source, JpegEncoder::new())?;
//!
//!     let mut stats = session.stats();
//!     stats.wait_for(|s| s.frames_emitted >= 90).await.ok();
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Configuration and observability
pub mod config;
pub mod logging;

// Frame pipeline
pub mod encoder;
pub mod message;
pub mod pacer;
pub mod source;
pub mod sources;

// Fan-out and orchestration
pub mod broadcast;
pub mod registry;
pub mod server;
pub mod session;

// Core exports
pub use error::*;
pub use types::*;

// Main API exports
pub use broadcast::{BroadcastReport, Broadcaster};
pub use config::Settings;
pub use encoder::{FrameEncoder, JpegEncoder};
pub use message::{FrameIdMode, FrameMessage, StreamIdentity};
pub use pacer::{Pacer, PacerMetrics};
pub use registry::{SubscriberId, SubscriberRegistry, SubscriberSink};
pub use session::{SessionConfig, SessionHandle, SessionStats, StreamSession};
pub use source::FrameSource;
