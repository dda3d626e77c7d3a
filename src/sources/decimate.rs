//! Frame skipping for emission rates below the native rate

use tracing::trace;

use crate::Result;
use crate::source::FrameSource;
use crate::types::{EffectiveRate, RawFrame, SourceInfo};

/// Consumes `native / effective` source frames per read and returns the last one
///
/// Fractional ratios are accumulated, so 30 → 20 fps alternates between one and
/// two skipped frames. A ratio at or below one reads exactly one frame.
pub struct Decimate<S> {
    inner: S,
    frames_per_tick: f64,
    debt: f64,
}

impl<S: FrameSource> Decimate<S> {
    /// Wrap a source for the given effective rate
    pub fn new(inner: S, rate: &EffectiveRate) -> Self {
        Self { inner, frames_per_tick: rate.frames_per_tick(), debt: 0.0 }
    }
}

impl<S: FrameSource> FrameSource for Decimate<S> {
    fn info(&self) -> SourceInfo {
        self.inner.info()
    }

    fn read(&mut self) -> Result<Option<RawFrame>> {
        self.debt += self.frames_per_tick;
        let take = (self.debt.floor() as u64).max(1);
        self.debt = (self.debt - take as f64).max(0.0);

        let mut last = None;
        for _ in 0..take {
            match self.inner.read()? {
                Some(frame) => last = Some(frame),
                None => break,
            }
        }

        if take > 1 {
            trace!(skipped = take - 1, "Skipped source frames");
        }

        Ok(last)
    }

    fn seek_to_start(&mut self) -> Result<()> {
        self.debt = 0.0;
        self.inner.seek_to_start()
    }

    fn close(&mut self) {
        self.inner.close()
    }

    fn loop_count(&self) -> u64 {
        self.inner.loop_count()
    }
}
