//! Loop-on-end wrapper

use tracing::{debug, info};

use crate::Result;
use crate::source::FrameSource;
use crate::types::{RawFrame, SourceInfo};

/// Rewinds the inner source whenever it reaches end-of-stream
///
/// Downstream never sees a loop boundary: the first frame of the next pass is
/// returned from the same `read` call that hit the end.
pub struct LoopingSource<S> {
    inner: S,
    enabled: bool,
    loops: u64,
}

impl<S: FrameSource> LoopingSource<S> {
    /// Wrap a source; with `enabled == false` end-of-stream passes through
    pub fn new(inner: S, enabled: bool) -> Self {
        Self { inner, enabled, loops: 0 }
    }

    /// Access the wrapped source
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: FrameSource> FrameSource for LoopingSource<S> {
    fn info(&self) -> SourceInfo {
        self.inner.info()
    }

    fn read(&mut self) -> Result<Option<RawFrame>> {
        if let Some(frame) = self.inner.read()? {
            return Ok(Some(frame));
        }

        if !self.enabled {
            info!("Source ended and looping is disabled");
            return Ok(None);
        }

        self.inner.seek_to_start()?;
        self.loops += 1;
        debug!(loops = self.loops, "Source looped to start");

        // A source that is still empty after rewinding has nothing left to give
        self.inner.read()
    }

    fn seek_to_start(&mut self) -> Result<()> {
        self.inner.seek_to_start()
    }

    fn close(&mut self) {
        self.inner.close()
    }

    fn loop_count(&self) -> u64 {
        self.loops
    }
}
