//! Session orchestration
//!
//! A session owns one frame source, one encoder and one subscriber registry. It
//! validates everything that can fail before the first frame is read, then spawns
//! a single pacing task:
//!
//! ```text
//!   wait_next_slot ─► read + encode ─► await previous broadcast ─► spawn broadcast
//!        ▲            (blocking pool)                                    │
//!        └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Encoding of slot `n + 1` overlaps delivery of slot `n`, but two broadcasts are
//! never in flight together, so each subscriber sees frames in order.

use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::broadcast::{BroadcastReport, Broadcaster, DEFAULT_DELIVERY_TIMEOUT};
use crate::encoder::FrameEncoder;
use crate::message::{FrameIdAllocator, FrameIdMode, FrameMessage, StreamIdentity};
use crate::pacer::{Pacer, PacerMetrics};
use crate::registry::SubscriberRegistry;
use crate::source::FrameSource;
use crate::sources::Decimate;
use crate::types::{EffectiveRate, RateSetting, SourceInfo};
use crate::{Result, StreamError};

/// Default JPEG quality
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Everything a session needs besides its source and encoder
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Configured emission rate, resolved against the source at start
    pub rate: RateSetting,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    /// `source` and `version` stamped on every message
    pub identity: StreamIdentity,
    /// How frame ids relate to pacer slots
    pub frame_id_mode: FrameIdMode,
    /// Bound on each delivery, on draining the last broadcast and on each close at shutdown
    pub delivery_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rate: RateSetting::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            identity: StreamIdentity::default(),
            frame_id_mode: FrameIdMode::default(),
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }
}

impl SessionConfig {
    /// Range checks that need no source
    pub fn validate(&self) -> Result<()> {
        self.rate.validate()?;

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(StreamError::invalid_config(
                "video.jpeg_quality",
                format!("{} is outside 1-100", self.jpeg_quality),
            ));
        }
        if self.delivery_timeout.is_zero() {
            return Err(StreamError::invalid_config("server.delivery_timeout_ms", "must be positive"));
        }
        Ok(())
    }
}

/// Published after every tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    /// Whether the pacing task is still running
    pub running: bool,
    /// Declared emission rate
    pub fps: u32,
    /// Messages handed to the broadcaster
    pub frames_emitted: u64,
    /// Ticks whose frame could not be read, encoded or serialized
    pub frames_skipped: u64,
    /// `frame_id` of the latest emitted message
    pub last_frame_id: Option<u64>,
    /// Times the source wrapped around to its first frame
    pub source_loops: u64,
    /// Registered subscribers when the stats were published
    pub subscribers: usize,
    /// Subscribers removed by the broadcaster after a failed delivery
    pub evictions: u64,
    pub pacer: PacerMetrics,
}

/// Entry point for streaming sessions
pub struct StreamSession;

impl StreamSession {
    /// Validate and start a session
    ///
    /// Fails without reading a frame when the configuration is out of range, the
    /// source is empty or the configured rate exceeds the source's native rate.
    /// Must be called from within a tokio runtime.
    pub fn start<S, E>(config: SessionConfig, source: S, encoder: E) -> Result<SessionHandle>
    where
        S: FrameSource,
        E: FrameEncoder,
    {
        config.validate()?;

        let info = source.info();
        if info.total_frames == 0 {
            return Err(StreamError::EmptySource { path: "<frame source>".into() });
        }
        let rate = config.rate.resolve(&info)?;

        let source: Box<dyn FrameSource> = if rate.needs_skipping() {
            info!(
                native_fps = rate.native_rate(),
                fps = rate.fps(),
                frames_per_tick = rate.frames_per_tick(),
                "Emitting below native rate, source frames will be skipped"
            );
            Box::new(Decimate::new(source, &rate))
        } else {
            Box::new(source)
        };

        let pacer = Pacer::new(rate.fps())?;
        let registry = Arc::new(SubscriberRegistry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry), config.delivery_timeout);

        let (stats_tx, stats_rx) = watch::channel(SessionStats {
            running: true,
            fps: rate.fps(),
            pacer: pacer.metrics(),
            ..Default::default()
        });
        let cancel = CancellationToken::new();
        let resync = Arc::new(Notify::new());

        info!(
            source = %config.identity.source,
            version = %config.identity.version,
            width = info.width,
            height = info.height,
            total_frames = info.total_frames,
            fps = rate.fps(),
            "Starting stream session"
        );

        let task = PacingTask {
            pacer,
            pipeline: Some(Pipeline {
                source,
                encoder: Box::new(encoder),
                quality: config.jpeg_quality,
            }),
            broadcaster,
            identity: config.identity,
            frame_ids: FrameIdAllocator::new(config.frame_id_mode),
            delivery_timeout: config.delivery_timeout,
            stats: stats_tx,
            cancel: cancel.clone(),
            resync: Arc::clone(&resync),
            counters: Counters::default(),
        };
        let task = tokio::spawn(task.run());

        Ok(SessionHandle {
            registry,
            delivery_timeout: config.delivery_timeout,
            stats: stats_rx,
            resync,
            cancel,
            task: Some(task),
            rate,
            info,
        })
    }
}

/// Control surface of a running session
///
/// Dropping the handle stops the pacing task; [`shutdown`](Self::shutdown) also
/// waits for teardown to finish.
pub struct SessionHandle {
    registry: Arc<SubscriberRegistry>,
    delivery_timeout: Duration,
    stats: watch::Receiver<SessionStats>,
    resync: Arc<Notify>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    rate: EffectiveRate,
    info: SourceInfo,
}

impl SessionHandle {
    /// Registry that connection handlers join and leave
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Bound on each delivery and each subscriber close
    pub fn delivery_timeout(&self) -> Duration {
        self.delivery_timeout
    }

    /// Receiver of per-tick statistics
    pub fn stats(&self) -> watch::Receiver<SessionStats> {
        self.stats.clone()
    }

    /// Latest published statistics
    pub fn current_stats(&self) -> SessionStats {
        self.stats.borrow().clone()
    }

    /// Rate the session runs at
    pub fn effective_rate(&self) -> EffectiveRate {
        self.rate
    }

    /// Source metadata captured at start
    pub fn source_info(&self) -> SourceInfo {
        self.info
    }

    /// Whether the pacing loop is still running
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Token cancelled once the session starts stopping, for whatever reason
    pub fn stopping_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    /// Re-anchor the pacer so the next slot is due immediately
    pub fn resync(&self) {
        self.resync.notify_one();
    }

    /// Stop pacing, drain the in-flight broadcast, release the source and close
    /// every subscriber
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Pacing task failed during shutdown: {}", e);
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Owned by the pacing task and lent to the blocking pool for each tick
struct Pipeline {
    source: Box<dyn FrameSource>,
    encoder: Box<dyn FrameEncoder>,
    quality: u8,
}

enum TickOutput {
    Encoded { payload: Vec<u8>, position: u64 },
    Skipped(StreamError),
    Ended,
}

impl Pipeline {
    fn produce(&mut self) -> TickOutput {
        let frame = match self.source.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => return TickOutput::Ended,
            Err(e) => return TickOutput::Skipped(e),
        };

        match self.encoder.encode(&frame, self.quality) {
            Ok(payload) => TickOutput::Encoded { payload, position: frame.position },
            Err(e) => TickOutput::Skipped(e),
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    emitted: u64,
    skipped: u64,
    last_frame_id: Option<u64>,
    loops: u64,
    evictions: u64,
}

struct PacingTask {
    pacer: Pacer,
    pipeline: Option<Pipeline>,
    broadcaster: Broadcaster,
    identity: StreamIdentity,
    frame_ids: FrameIdAllocator,
    delivery_timeout: Duration,
    stats: watch::Sender<SessionStats>,
    cancel: CancellationToken,
    resync: Arc<Notify>,
    counters: Counters,
}

impl PacingTask {
    async fn run(mut self) {
        info!(fps = self.pacer.fps(), "Pacing task started");
        self.pacer.start();
        let mut in_flight: Option<JoinHandle<BroadcastReport>> = None;

        loop {
            let slot = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!(next_slot = self.pacer.next_slot(), "Pacing task cancelled");
                    break;
                }
                _ = self.resync.notified() => {
                    self.pacer.reset_anchor();
                    continue;
                }
                slot = self.pacer.wait_next_slot() => slot,
            };

            let Some(mut pipeline) = self.pipeline.take() else {
                break;
            };
            let produced = tokio::task::spawn_blocking(move || {
                let output = pipeline.produce();
                (pipeline, output)
            })
            .await;

            let output = match produced {
                Ok((pipeline, output)) => {
                    self.counters.loops = pipeline.source.loop_count();
                    self.pipeline = Some(pipeline);
                    output
                }
                Err(e) => {
                    error!(slot, "Frame pipeline panicked, stopping session: {}", e);
                    break;
                }
            };

            match output {
                TickOutput::Encoded { payload, position } => {
                    self.settle(in_flight.take()).await;
                    match self.assemble(slot, &payload) {
                        Ok((frame_id, message)) => {
                            trace!(slot, frame_id, position, bytes = payload.len(), "Emitting frame");
                            let broadcaster = self.broadcaster.clone();
                            in_flight = Some(tokio::spawn(async move { broadcaster.broadcast(message).await }));
                            self.counters.emitted += 1;
                            self.counters.last_frame_id = Some(frame_id);
                        }
                        Err(e) => self.skip(slot, e),
                    }
                }
                TickOutput::Skipped(e) => self.skip(slot, e),
                TickOutput::Ended => {
                    info!(slot, "Source ended, stopping session");
                    break;
                }
            }

            self.publish(true);
        }

        self.teardown(in_flight).await;
    }

    fn assemble(&mut self, slot: u64, payload: &[u8]) -> Result<(u64, Arc<str>)> {
        let frame_id = self.frame_ids.assign(slot);
        let timestamp = self.pacer.wall_clock_timestamp();
        let message = FrameMessage::new(&self.identity, frame_id, timestamp, self.pacer.fps(), payload);
        Ok((frame_id, message.to_json()?))
    }

    fn skip(&mut self, slot: u64, error: StreamError) {
        self.counters.skipped += 1;
        warn!(slot, skipped = self.counters.skipped, "Skipping tick: {}", error);
    }

    /// Wait for the previous broadcast, bounded by the delivery timeout
    async fn settle(&mut self, in_flight: Option<JoinHandle<BroadcastReport>>) {
        let Some(handle) = in_flight else {
            return;
        };

        // A broadcast bounds itself; the extra margin only covers task scheduling
        if let Some(report) = settle_or_abort(handle, self.delivery_timeout * 2).await {
            self.counters.evictions += report.evicted.len() as u64;
        }
    }

    fn publish(&self, running: bool) {
        self.stats.send_replace(SessionStats {
            running,
            fps: self.pacer.fps(),
            frames_emitted: self.counters.emitted,
            frames_skipped: self.counters.skipped,
            last_frame_id: self.counters.last_frame_id,
            source_loops: self.counters.loops,
            subscribers: self.broadcaster.registry().count(),
            evictions: self.counters.evictions,
            pacer: self.pacer.metrics(),
        });
    }

    async fn teardown(mut self, in_flight: Option<JoinHandle<BroadcastReport>>) {
        // Connection handlers watch this token; anyone joining from now on leaves again
        self.cancel.cancel();

        self.settle(in_flight).await;

        if let Some(mut pipeline) = self.pipeline.take() {
            let closed = tokio::task::spawn_blocking(move || pipeline.source.close()).await;
            if let Err(e) = closed {
                error!("Closing frame source failed: {}", e);
            }
        }

        let subscribers = self.broadcaster.registry().drain();
        let count = subscribers.len();
        let limit = self.delivery_timeout;
        join_all(subscribers.into_iter().map(|(id, sink)| async move {
            if timeout(limit, sink.close()).await.is_err() {
                debug!(subscriber = %id, "Subscriber close timed out");
            }
        }))
        .await;

        self.publish(false);
        info!(
            frames_emitted = self.counters.emitted,
            frames_skipped = self.counters.skipped,
            subscribers_closed = count,
            "Stream session stopped"
        );
    }
}

/// Await a spawned task for at most `limit`, aborting it when it overruns
///
/// An aborted broadcast can no longer write to subscribers, so the next one never
/// overlaps it.
async fn settle_or_abort<T>(mut handle: JoinHandle<T>, limit: Duration) -> Option<T> {
    match timeout(limit, &mut handle).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            error!("Broadcast task failed: {}", e);
            None
        }
        Err(_) => {
            warn!(limit_ms = limit.as_millis() as u64, "Previous broadcast did not settle in time, aborting it");
            handle.abort();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SubscriberSink;
    use crate::sources::LoopingSource;
    use crate::test_utils::{CountingSource, HangingSink, RecordingSink, StubEncoder};
    use tokio::time::{Instant, sleep};

    fn config(rate: RateSetting) -> SessionConfig {
        SessionConfig { rate, ..Default::default() }
    }

    async fn wait_for_frames(handle: &SessionHandle, frames: u64) -> SessionStats {
        let mut stats = handle.stats();
        stats.wait_for(|s| s.frames_emitted >= frames || !s.running).await.unwrap().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn frame_ids_continue_across_loop_boundaries() {
        let source = LoopingSource::new(CountingSource::new(10, 10.0), true);
        let handle = StreamSession::start(config(RateSetting::Fixed(10)), source, StubEncoder::new()).unwrap();
        let sink = Arc::new(RecordingSink::new());
        handle.registry().add(Arc::clone(&sink) as Arc<dyn SubscriberSink>);

        let stats = wait_for_frames(&handle, 25).await;
        assert_eq!(stats.frames_emitted, 25);
        assert_eq!(stats.source_loops, 2);
        assert_eq!(stats.last_frame_id, Some(24));

        handle.shutdown().await;

        let ids = sink.frame_ids();
        assert_eq!(ids[..25], (0..25).collect::<Vec<u64>>());
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn rate_above_native_fails_before_reading() {
        let source = CountingSource::new(10, 30.0);
        let probe = source.probe();
        let encoder = Arc::new(StubEncoder::new());

        let result = StreamSession::start(config(RateSetting::Fixed(60)), source, Arc::clone(&encoder));

        match result {
            Err(StreamError::InvalidRate { configured, native }) => {
                assert_eq!(configured, 60);
                assert_eq!(native, 30.0);
            }
            Err(other) => panic!("Expected InvalidRate, got {other:?}"),
            Ok(_) => panic!("Expected InvalidRate, session started"),
        }
        assert_eq!(probe.reads(), 0);
        assert_eq!(encoder.calls(), 0);
    }

    #[tokio::test]
    async fn auto_rate_follows_native_rate() {
        let source = CountingSource::new(10, 30.0);
        let handle = StreamSession::start(config(RateSetting::from_fps(0)), source, StubEncoder::new()).unwrap();

        assert_eq!(handle.effective_rate().fps(), 30);
        assert_eq!(handle.current_stats().fps, 30);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn empty_source_is_rejected() {
        let result = StreamSession::start(config(RateSetting::Auto), CountingSource::new(0, 30.0), StubEncoder::new());
        assert!(matches!(result, Err(StreamError::EmptySource { .. })));
    }

    #[tokio::test]
    async fn out_of_range_quality_is_rejected() {
        let config = SessionConfig { jpeg_quality: 0, ..Default::default() };
        let result = StreamSession::start(config, CountingSource::new(5, 30.0), StubEncoder::new());
        assert!(matches!(result, Err(StreamError::InvalidConfig { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn encode_failure_leaves_a_gap_in_slot_mode() {
        let encoder = StubEncoder::new().failing_on([2]);
        let handle = StreamSession::start(config(RateSetting::Fixed(30)), CountingSource::new(5, 30.0), encoder).unwrap();
        let sink = Arc::new(RecordingSink::new());
        handle.registry().add(Arc::clone(&sink) as Arc<dyn SubscriberSink>);

        let mut stats = handle.stats();
        let last = stats.wait_for(|s| !s.running).await.unwrap().clone();

        assert_eq!(sink.frame_ids(), vec![0, 1, 3, 4]);
        assert_eq!(last.frames_emitted, 4);
        assert_eq!(last.frames_skipped, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn contiguous_mode_absorbs_skipped_ticks() {
        let source = CountingSource::new(5, 30.0).failing_at([1]);
        let config = SessionConfig { frame_id_mode: FrameIdMode::Contiguous, ..config(RateSetting::Fixed(30)) };
        let handle = StreamSession::start(config, source, StubEncoder::new()).unwrap();
        let sink = Arc::new(RecordingSink::new());
        handle.registry().add(Arc::clone(&sink) as Arc<dyn SubscriberSink>);

        let mut stats = handle.stats();
        stats.wait_for(|s| !s.running).await.unwrap();

        assert_eq!(sink.frame_ids(), vec![0, 1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn payload_is_the_encoder_output() {
        let handle =
            StreamSession::start(config(RateSetting::Fixed(30)), CountingSource::new(3, 30.0), StubEncoder::new()).unwrap();
        let sink = Arc::new(RecordingSink::new());
        handle.registry().add(Arc::clone(&sink) as Arc<dyn SubscriberSink>);

        handle.stats().wait_for(|s| !s.running).await.unwrap();

        let messages: Vec<FrameMessage> =
            sink.messages().iter().map(|raw| serde_json::from_str(raw).unwrap()).collect();
        assert_eq!(messages.len(), 3);
        for (position, message) in messages.iter().enumerate() {
            assert_eq!(message.decode_image().unwrap(), StubEncoder::payload_for(position as u64));
            assert_eq!(message.fps, 30);
            assert_eq!(message.source, "DrishtiStream");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn decimation_skips_source_frames() {
        let source = CountingSource::new(20, 30.0);
        let handle = StreamSession::start(config(RateSetting::Fixed(15)), source, StubEncoder::new()).unwrap();
        let sink = Arc::new(RecordingSink::new());
        handle.registry().add(Arc::clone(&sink) as Arc<dyn SubscriberSink>);

        handle.stats().wait_for(|s| !s.running).await.unwrap();

        let payloads: Vec<Vec<u8>> = sink
            .messages()
            .iter()
            .map(|raw| serde_json::from_str::<FrameMessage>(raw).unwrap().decode_image().unwrap())
            .collect();
        let expected: Vec<Vec<u8>> = [1, 3, 5, 7, 9, 11, 13, 15, 17, 19].into_iter().map(StubEncoder::payload_for).collect();
        assert_eq!(payloads, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_completes_despite_hung_subscriber() {
        let source = LoopingSource::new(CountingSource::new(10, 10.0), true);
        let probe = source.inner().probe();
        let handle = StreamSession::start(config(RateSetting::Fixed(10)), source, StubEncoder::new()).unwrap();

        let healthy = Arc::new(RecordingSink::new());
        let hanging = Arc::new(HangingSink::new());
        let registry = Arc::clone(handle.registry());
        registry.add(Arc::clone(&healthy) as Arc<dyn SubscriberSink>);
        registry.add(Arc::clone(&hanging) as Arc<dyn SubscriberSink>);

        wait_for_frames(&handle, 1).await;

        let started = Instant::now();
        handle.shutdown().await;

        assert!(started.elapsed() <= DEFAULT_DELIVERY_TIMEOUT * 2 + Duration::from_millis(50));
        assert!(probe.is_closed());
        assert!(healthy.is_closed());
        assert_eq!(registry.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn source_end_stops_session_and_closes_subscribers() {
        let handle =
            StreamSession::start(config(RateSetting::Fixed(30)), CountingSource::new(3, 30.0), StubEncoder::new()).unwrap();
        let sink = Arc::new(RecordingSink::new());
        handle.registry().add(Arc::clone(&sink) as Arc<dyn SubscriberSink>);
        let stopping = handle.stopping_token();

        let last = handle.stats().wait_for(|s| !s.running).await.unwrap().clone();

        assert!(stopping.is_cancelled());
        assert!(!handle.is_running());
        assert_eq!(last.frames_emitted, 3);
        assert_eq!(last.subscribers, 0);
        assert!(sink.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_task() {
        let source = LoopingSource::new(CountingSource::new(10, 10.0), true);
        let probe = source.inner().probe();
        let handle = StreamSession::start(config(RateSetting::Fixed(10)), source, StubEncoder::new()).unwrap();
        let mut stats = handle.stats();

        drop(handle);
        stats.wait_for(|s| !s.running).await.unwrap();

        assert!(probe.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn resync_keeps_frame_ids_increasing() {
        let source = LoopingSource::new(CountingSource::new(10, 10.0), true);
        let handle = StreamSession::start(config(RateSetting::Fixed(10)), source, StubEncoder::new()).unwrap();
        let sink = Arc::new(RecordingSink::new());
        handle.registry().add(Arc::clone(&sink) as Arc<dyn SubscriberSink>);

        wait_for_frames(&handle, 3).await;
        handle.resync();
        sleep(Duration::from_millis(500)).await;
        handle.shutdown().await;

        let ids = sink.frame_ids();
        assert!(ids.len() > 3);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids[0], 0);
    }

    #[tokio::test(start_paused = true)]
    async fn overrunning_task_is_aborted_when_settling() {
        let (held, released) = tokio::sync::oneshot::channel::<()>();
        let stuck = tokio::spawn(async move {
            let _held = held;
            std::future::pending::<BroadcastReport>().await
        });

        let started = Instant::now();
        let settled = settle_or_abort(stuck, Duration::from_secs(2)).await;

        assert!(settled.is_none());
        assert!(started.elapsed() >= Duration::from_secs(2));
        // Aborting drops the task's future, and with it the sender
        assert!(timeout(Duration::from_secs(1), released).await.unwrap().is_err());
    }

    #[tokio::test]
    async fn finished_task_is_settled_with_its_report() {
        let done = tokio::spawn(async { BroadcastReport { attempted: 2, delivered: 2, evicted: Vec::new() } });

        let report = settle_or_abort(done, Duration::from_secs(1)).await.unwrap();

        assert_eq!(report.delivered, 2);
    }
}
