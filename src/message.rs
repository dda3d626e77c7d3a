//! Outbound frame message schema
//!
//! One JSON object per frame per subscriber:
//!
//! ```json
//! {
//!   "source": "DrishtiStream",
//!   "version": "v1.0",
//!   "frame_id": 1234,
//!   "timestamp": 1707321234.567,
//!   "fps": 30,
//!   "image": "<base64 JPEG>"
//! }
//! ```
//!
//! Consumers depend on this layout; any change to it is a protocol version bump.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::Result;

/// Default value of the `source` field
pub const DEFAULT_SOURCE_ID: &str = "DrishtiStream";

/// Default value of the `version` field
pub const DEFAULT_PROTOCOL_VERSION: &str = "v1.0";

/// Fields that stay constant for a whole session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamIdentity {
    /// Fixed string identifying the service
    pub source: String,
    /// Protocol version string
    pub version: String,
}

impl Default for StreamIdentity {
    fn default() -> Self {
        Self { source: DEFAULT_SOURCE_ID.to_string(), version: DEFAULT_PROTOCOL_VERSION.to_string() }
    }
}

/// How `frame_id` is derived when ticks are skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameIdMode {
    /// `frame_id` is the pacer slot; a skipped tick leaves a gap
    #[default]
    Slot,
    /// `frame_id` counts emitted messages; no gaps
    Contiguous,
}

/// Assigns `frame_id`s according to a [`FrameIdMode`]
#[derive(Debug, Clone)]
pub struct FrameIdAllocator {
    mode: FrameIdMode,
    emitted: u64,
}

impl FrameIdAllocator {
    /// Create an allocator
    pub fn new(mode: FrameIdMode) -> Self {
        Self { mode, emitted: 0 }
    }

    /// Id for a message about to be emitted in `slot`
    ///
    /// Call once per emitted message; skipped ticks must not call it.
    pub fn assign(&mut self, slot: u64) -> u64 {
        let id = match self.mode {
            FrameIdMode::Slot => slot,
            FrameIdMode::Contiguous => self.emitted,
        };
        self.emitted += 1;
        id
    }
}

/// One emitted frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMessage {
    pub source: String,
    pub version: String,
    pub frame_id: u64,
    /// UNIX seconds at the actual emission instant
    pub timestamp: f64,
    pub fps: u32,
    /// Base64 of exactly the encoder's output
    pub image: String,
}

impl FrameMessage {
    /// Assemble a message around an encoded payload
    pub fn new(
        identity: &StreamIdentity,
        frame_id: u64,
        timestamp: f64,
        fps: u32,
        payload: &[u8],
    ) -> Self {
        Self {
            source: identity.source.clone(),
            version: identity.version.clone(),
            frame_id,
            timestamp,
            fps,
            image: BASE64.encode(payload),
        }
    }

    /// Serialize once for fan-out; subscribers share the same allocation
    pub fn to_json(&self) -> Result<Arc<str>> {
        Ok(serde_json::to_string(self)?.into())
    }

    /// Decode the `image` field back into encoder bytes
    pub fn decode_image(&self) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.image)
    }
}
