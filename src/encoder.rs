//! Frame compression

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;

use crate::types::RawFrame;
use crate::{Result, StreamError};

/// Compresses a raw frame into a transportable byte buffer
pub trait FrameEncoder: Send + Sync + 'static {
    /// Encode one frame at the given quality (1-100)
    fn encode(&self, frame: &RawFrame, quality: u8) -> Result<Vec<u8>>;
}

impl<E: FrameEncoder + ?Sized> FrameEncoder for std::sync::Arc<E> {
    fn encode(&self, frame: &RawFrame, quality: u8) -> Result<Vec<u8>> {
        (**self).encode(frame, quality)
    }
}

/// Baseline JPEG encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegEncoder;

impl JpegEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self
    }
}

impl FrameEncoder for JpegEncoder {
    fn encode(&self, frame: &RawFrame, quality: u8) -> Result<Vec<u8>> {
        if frame.pixels.len() != frame.expected_len() {
            return Err(StreamError::encode(format!(
                "pixel buffer holds {} bytes, {}x{} RGB8 needs {}",
                frame.pixels.len(),
                frame.width,
                frame.height,
                frame.expected_len()
            )));
        }

        let mut buffer = Vec::with_capacity(frame.expected_len() / 8);
        ImageJpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
            .encode(&frame.pixels, frame.width, frame.height, ExtendedColorType::Rgb8)
            .map_err(|e| StreamError::encode(e.to_string()))?;

        Ok(buffer)
    }
}
