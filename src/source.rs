//! Frame source trait

use crate::Result;
use crate::types::{RawFrame, SourceInfo};

/// Sequential supply of decoded frames
///
/// Sources abstract over where pictures come from (image sequences, test
/// patterns, a real demuxer). A source is opened by its constructor, then owned
/// exclusively by the pacing task, so implementations need no internal locking.
///
/// `read` is called on the blocking thread pool; it may do file I/O and decoding.
pub trait FrameSource: Send + 'static {
    /// Metadata captured when the source was opened
    fn info(&self) -> SourceInfo;

    /// Read the next frame
    ///
    /// Returns:
    /// - `Ok(Some(frame))` - Frame available
    /// - `Ok(None)` - End of stream
    /// - `Err(e)` - This frame could not be produced; the next call moves on
    fn read(&mut self) -> Result<Option<RawFrame>>;

    /// Rewind to the first frame
    fn seek_to_start(&mut self) -> Result<()>;

    /// Release underlying resources. Further reads return end of stream.
    fn close(&mut self);

    /// How many times the source wrapped around to its first frame
    fn loop_count(&self) -> u64 {
        0
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn info(&self) -> SourceInfo {
        (**self).info()
    }

    fn read(&mut self) -> Result<Option<RawFrame>> {
        (**self).read()
    }

    fn seek_to_start(&mut self) -> Result<()> {
        (**self).seek_to_start()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn loop_count(&self) -> u64 {
        (**self).loop_count()
    }
}
