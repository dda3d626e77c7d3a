//! Wall-clock anchored frame pacing
//!
//! The pacer turns a fixed frame rate into a sequence of slots, each with a target
//! instant computed from a single anchor:
//!
//! ```text
//! target(n) = anchor + n / fps
//! ```
//!
//! Targets never depend on when the previous slot actually completed, so a slow
//! tick delays only itself. If the pacing task falls behind, overdue slots are
//! released immediately and the lag is recorded; the schedule is not moved.
//!
//! ```rust
//! use drishti_stream::Pacer;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> drishti_stream::Result<()> {
//! let mut pacer = Pacer::new(30)?;
//! let first = pacer.wait_next_slot().await;
//! let second = pacer.wait_next_slot().await;
//! assert_eq!((first, second), (0, 1));
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use crate::Result;
use crate::types::RateSetting;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Snapshot of pacing health
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct PacerMetrics {
    /// Slots released since start
    pub slot_count: u64,
    /// Seconds since the anchor
    pub elapsed: f64,
    /// Configured rate
    pub target_rate: u32,
    /// `slot_count / elapsed`
    pub observed_rate: f64,
    /// Slots released minus slots due; positive means ahead of schedule
    pub drift: i64,
    /// Slots released more than one interval after their target
    pub late_slots: u64,
    /// Worst lag seen, in milliseconds
    pub max_lag_ms: f64,
}

/// Fixed-rate scheduler anchored to a single origin instant
#[derive(Debug)]
pub struct Pacer {
    fps: u32,
    interval: Duration,
    anchor: Option<Instant>,
    next_slot: u64,
    late_slots: u64,
    max_lag: Duration,
}

impl Pacer {
    /// Create a pacer for `fps` frames per second (1-120)
    pub fn new(fps: u32) -> Result<Self> {
        RateSetting::Fixed(fps).validate()?;

        Ok(Self {
            fps,
            interval: Duration::from_nanos((NANOS_PER_SEC / fps as u128) as u64),
            anchor: None,
            next_slot: 0,
            late_slots: 0,
            max_lag: Duration::ZERO,
        })
    }

    /// Capture the anchor and reset the slot counter
    ///
    /// Called once per session; [`wait_next_slot`](Self::wait_next_slot) calls it
    /// implicitly if nobody did.
    pub fn start(&mut self) {
        self.anchor = Some(Instant::now());
        self.next_slot = 0;
        self.late_slots = 0;
        self.max_lag = Duration::ZERO;
        debug!(fps = self.fps, "Pacer started");
    }

    /// Whether the anchor has been captured
    pub fn is_started(&self) -> bool {
        self.anchor.is_some()
    }

    /// Configured frames per second
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Nominal time between slots (rounded down to whole nanoseconds)
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Slot that the next call to `wait_next_slot` will return
    pub fn next_slot(&self) -> u64 {
        self.next_slot
    }

    /// Offset of a slot's target from the anchor
    ///
    /// Computed as `slot * 1s / fps` in integer nanoseconds, so slot `k * fps` lands
    /// exactly on `k` seconds with no per-slot rounding carried forward.
    pub fn offset_for(&self, slot: u64) -> Duration {
        let nanos = slot as u128 * NANOS_PER_SEC / self.fps as u128;
        Duration::from_nanos(nanos.min(u64::MAX as u128) as u64)
    }

    /// Target instant of a slot, if the pacer has started
    pub fn target_for(&self, slot: u64) -> Option<Instant> {
        self.anchor.map(|anchor| anchor + self.offset_for(slot))
    }

    /// Suspend until the next slot's target instant and return the slot
    ///
    /// Overdue slots return immediately. Cancel-safe: dropping the future before
    /// it completes does not consume a slot.
    pub async fn wait_next_slot(&mut self) -> u64 {
        if self.anchor.is_none() {
            self.start();
        }
        let anchor = self.anchor.unwrap_or_else(Instant::now);

        let slot = self.next_slot;
        let target = anchor + self.offset_for(slot);
        let now = Instant::now();

        if target > now {
            sleep_until(target).await;
        } else {
            let lag = now - target;
            if lag > self.interval {
                self.late_slots += 1;
                self.max_lag = self.max_lag.max(lag);
                debug!(
                    slot,
                    lag_ms = lag.as_secs_f64() * 1000.0,
                    late_slots = self.late_slots,
                    "Pacer behind schedule"
                );
            }
        }

        self.next_slot += 1;
        slot
    }

    /// Wall-clock time right now, in UNIX seconds
    ///
    /// Used as the emission timestamp; distinct from the slot's target instant.
    pub fn wall_clock_timestamp(&self) -> f64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs_f64()).unwrap_or_default()
    }

    /// Re-anchor so the next slot is due now, keeping the slot counter
    ///
    /// Administrative resync only; normal operation never moves the anchor.
    pub fn reset_anchor(&mut self) {
        let now = Instant::now();
        let offset = self.offset_for(self.next_slot);
        let anchor = now.checked_sub(offset).unwrap_or(now);

        if let Some(previous) = self.anchor {
            let shift = anchor.saturating_duration_since(previous);
            warn!(
                next_slot = self.next_slot,
                shift_ms = shift.as_secs_f64() * 1000.0,
                "Pacer re-anchored"
            );
        }

        self.anchor = Some(anchor);
    }

    /// Current pacing statistics
    pub fn metrics(&self) -> PacerMetrics {
        let elapsed = self.anchor.map(|a| a.elapsed().as_secs_f64()).unwrap_or(0.0);
        let slot_count = self.next_slot;
        let observed_rate = if elapsed > 0.0 { slot_count as f64 / elapsed } else { 0.0 };
        let due = (elapsed * self.fps as f64).floor() as i64;

        PacerMetrics {
            slot_count,
            elapsed,
            target_rate: self.fps,
            observed_rate,
            drift: slot_count as i64 - due,
            late_slots: self.late_slots,
            max_lag_ms: self.max_lag.as_secs_f64() * 1000.0,
        }
    }
}
