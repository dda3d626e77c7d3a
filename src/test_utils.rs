//! Test doubles shared by unit tests and benchmarks
//!
//! Sources, encoders and sinks with scripted behaviour, so pacing, broadcast and
//! session logic can be exercised without image files or sockets.

#![cfg(any(test, feature = "benchmark"))]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::encoder::FrameEncoder;
use crate::registry::SubscriberSink;
use crate::source::FrameSource;
use crate::types::{RawFrame, SourceInfo};
use crate::{Result, StreamError};

/// Observes a [`CountingSource`] after it has been moved into a session
#[derive(Debug, Clone, Default)]
pub struct SourceProbe {
    closed: Arc<AtomicBool>,
    reads: Arc<AtomicU64>,
}

impl SourceProbe {
    /// Whether `close` was called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of `read` calls that produced a frame
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }
}

/// In-memory source of `frames` tiny frames whose positions run `0..frames`
///
/// Every pixel of frame `n` holds `n as u8`.
#[derive(Debug)]
pub struct CountingSource {
    frames: u64,
    native_rate: f64,
    position: u64,
    failing: HashSet<u64>,
    probe: SourceProbe,
}

impl CountingSource {
    pub const WIDTH: u32 = 4;
    pub const HEIGHT: u32 = 2;

    pub fn new(frames: u64, native_rate: f64) -> Self {
        Self {
            frames,
            native_rate,
            position: 0,
            failing: HashSet::new(),
            probe: SourceProbe::default(),
        }
    }

    /// Make reads at these positions fail with a decode error
    pub fn failing_at(mut self, positions: impl IntoIterator<Item = u64>) -> Self {
        self.failing.extend(positions);
        self
    }

    pub fn probe(&self) -> SourceProbe {
        self.probe.clone()
    }
}

impl FrameSource for CountingSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            width: Self::WIDTH,
            height: Self::HEIGHT,
            native_rate: self.native_rate,
            total_frames: self.frames,
        }
    }

    fn read(&mut self) -> Result<Option<RawFrame>> {
        if self.probe.is_closed() || self.position >= self.frames {
            return Ok(None);
        }

        let position = self.position;
        self.position += 1;

        if self.failing.contains(&position) {
            return Err(StreamError::decode(position, "scripted failure"));
        }

        self.probe.reads.fetch_add(1, Ordering::SeqCst);
        let pixels = vec![position as u8; (Self::WIDTH * Self::HEIGHT * 3) as usize];
        Ok(Some(RawFrame::new(Self::WIDTH, Self::HEIGHT, pixels, position)))
    }

    fn seek_to_start(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }

    fn close(&mut self) {
        self.probe.closed.store(true, Ordering::SeqCst);
    }
}

/// Encoder producing `frame-<position>` without touching pixels
#[derive(Debug, Default)]
pub struct StubEncoder {
    failing: HashSet<u64>,
    calls: AtomicU64,
}

impl StubEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make encoding of frames at these source positions fail
    pub fn failing_on(mut self, positions: impl IntoIterator<Item = u64>) -> Self {
        self.failing.extend(positions);
        self
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Payload this encoder produces for a source position
    pub fn payload_for(position: u64) -> Vec<u8> {
        format!("frame-{position}").into_bytes()
    }
}

impl FrameEncoder for StubEncoder {
    fn encode(&self, frame: &RawFrame, _quality: u8) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&frame.position) {
            return Err(StreamError::encode(format!("scripted failure at {}", frame.position)));
        }
        Ok(Self::payload_for(frame.position))
    }
}

/// Sink that stores every delivered message
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<Arc<str>>>,
    closed: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Arc<str>> {
        self.messages.lock().unwrap().clone()
    }

    /// `frame_id` of every received message, in arrival order
    pub fn frame_ids(&self) -> Vec<u64> {
        self.messages()
            .iter()
            .map(|raw| {
                let value: serde_json::Value = serde_json::from_str(raw).unwrap();
                value["frame_id"].as_u64().unwrap()
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriberSink for RecordingSink {
    async fn deliver(&self, message: Arc<str>) -> Result<()> {
        self.messages.lock().unwrap().push(message);
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Sink whose deliveries never complete
#[derive(Debug, Default)]
pub struct HangingSink {
    closed: AtomicBool,
}

impl HangingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriberSink for HangingSink {
    async fn deliver(&self, _message: Arc<str>) -> Result<()> {
        std::future::pending().await
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Sink whose deliveries fail immediately
#[derive(Debug, Default)]
pub struct FailingSink {
    attempts: AtomicU64,
    closed: AtomicBool,
}

impl FailingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriberSink for FailingSink {
    async fn deliver(&self, _message: Arc<str>) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StreamError::delivery(0, "connection reset"))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Sink that accepts messages but whose close never completes, like a peer that stopped reading
#[derive(Debug, Default)]
pub struct StuckCloseSink;

#[async_trait]
impl SubscriberSink for StuckCloseSink {
    async fn deliver(&self, _message: Arc<str>) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {
        std::future::pending().await
    }
}

/// Sink that accepts and discards every message, counting deliveries
#[derive(Debug, Default)]
pub struct NullSink {
    delivered: AtomicU64,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SubscriberSink for NullSink {
    async fn deliver(&self, _message: Arc<str>) -> Result<()> {
        self.delivered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn close(&self) {}
}
