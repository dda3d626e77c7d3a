//! Decoded frame and source metadata types

use std::sync::Arc;

/// A decoded RGB8 picture
///
/// This is the unit that flows from a [`FrameSource`](crate::FrameSource) to a
/// [`FrameEncoder`](crate::FrameEncoder). Pixel data is shared via `Arc` so
/// wrappers can hold on to a frame without copying it.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Tightly packed RGB8 pixels, row-major
    pub pixels: Arc<[u8]>,

    /// Position of this frame within the underlying file (resets on loop)
    pub position: u64,
}

impl RawFrame {
    /// Create a new frame
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, position: u64) -> Self {
        Self { width, height, pixels: pixels.into(), position }
    }

    /// Expected pixel buffer length for the frame's dimensions
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Metadata reported by a source when it is opened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceInfo {
    /// Frame width in pixels
    pub width: u32,

    /// Frame height in pixels
    pub height: u32,

    /// Frame rate intrinsic to the source
    pub native_rate: f64,

    /// Number of frames before end-of-stream (one pass)
    pub total_frames: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_len_is_rgb8() {
        let frame = RawFrame::new(4, 2, vec![0; 24], 0);
        assert_eq!(frame.expected_len(), 24);
        assert_eq!(frame.pixels.len(), frame.expected_len());
    }
}
