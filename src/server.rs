//! HTTP and WebSocket surface
//!
//! | Route | Response |
//! |---|---|
//! | `GET /` | service description |
//! | `GET /health` | session statistics |
//! | `GET <stream_path>` | WebSocket upgrade; one frame message per tick |
//!
//! Each WebSocket connection is registered with the session's registry as soon as
//! the upgrade completes. Its task then only drains inbound traffic, which is
//! ignored, and waits for the peer to leave, the broadcaster to evict it, or the
//! session to stop.

use async_trait::async_trait;
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, watch};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::pacer::PacerMetrics;
use crate::registry::{SubscriberId, SubscriberRegistry, SubscriberSink};
use crate::session::{SessionHandle, SessionStats};
use crate::{Result, StreamError};

/// Static description served at `/`
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub stream_path: String,
    pub description: String,
}

/// Body of `/`
#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    #[serde(flatten)]
    pub info: ServiceInfo,
    pub status: &'static str,
}

/// Body of `/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub subscribers: usize,
    pub frames_emitted: u64,
    pub frames_skipped: u64,
    pub last_frame_id: Option<u64>,
    pub source_loops: u64,
    pub fps: u32,
    pub pacer: PacerMetrics,
}

impl HealthResponse {
    fn from_stats(stats: &SessionStats, subscribers: usize) -> Self {
        Self {
            status: if stats.running { "healthy" } else { "stopped" },
            subscribers,
            frames_emitted: stats.frames_emitted,
            frames_skipped: stats.frames_skipped,
            last_frame_id: stats.last_frame_id,
            source_loops: stats.source_loops,
            fps: stats.fps,
            pacer: stats.pacer,
        }
    }
}

/// Shared by every request handler
#[derive(Clone)]
pub struct ServerState {
    info: Arc<ServiceInfo>,
    registry: Arc<SubscriberRegistry>,
    stats: watch::Receiver<SessionStats>,
    stopping: CancellationToken,
    close_timeout: Duration,
}

impl ServerState {
    /// Expose a running session
    pub fn new(session: &SessionHandle, info: ServiceInfo) -> Self {
        Self {
            info: Arc::new(info),
            registry: Arc::clone(session.registry()),
            stats: session.stats(),
            stopping: session.stopping_token(),
            close_timeout: session.delivery_timeout(),
        }
    }
}

/// Build the router for a session
pub fn router(state: ServerState) -> Router {
    let stream_path = state.info.stream_path.clone();
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(&stream_path, get(stream))
        .with_state(state)
}

/// Serve until `shutdown` resolves, then stop accepting connections
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn root(State(state): State<ServerState>) -> Json<RootResponse> {
    let status = if state.stopping.is_cancelled() { "stopping" } else { "running" };
    Json(RootResponse { info: (*state.info).clone(), status })
}

async fn health(State(state): State<ServerState>) -> Response {
    let stats = state.stats.borrow().clone();
    let body = HealthResponse::from_stats(&stats, state.registry.count());

    let code = if stats.running { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (code, Json(body)).into_response()
}

async fn stream(ws: WebSocketUpgrade, State(state): State<ServerState>) -> Response {
    if state.stopping.is_cancelled() {
        return (StatusCode::SERVICE_UNAVAILABLE, "stream has stopped").into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: ServerState) {
    let (sender, mut receiver) = socket.split();
    let mut sink = None;
    let id = state.registry.add_with(|id| {
        let created = Arc::new(WebSocketSink::new(id, sender));
        sink = Some(Arc::clone(&created));
        created as Arc<dyn SubscriberSink>
    });
    let Some(sink) = sink else {
        return;
    };

    loop {
        tokio::select! {
            _ = state.stopping.cancelled() => {
                debug!(subscriber = %id, "Session stopping");
                break;
            }
            _ = sink.closed.cancelled() => {
                debug!(subscriber = %id, "Connection closed by server");
                break;
            }
            inbound = receiver.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => {
                    debug!(subscriber = %id, "Peer closed connection");
                    break;
                }
                // No command protocol; inbound traffic only proves liveness
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    debug!(subscriber = %id, "Connection error: {}", e);
                    break;
                }
            }
        }
    }

    // Whoever removes the subscriber closes it
    if state.registry.remove(id).is_some() {
        close_within(id, &*sink, state.close_timeout).await;
    }
}

/// Close `sink`, giving up after `limit` when the peer has stopped reading
async fn close_within(id: SubscriberId, sink: &dyn SubscriberSink, limit: Duration) -> bool {
    let closed = timeout(limit, sink.close()).await.is_ok();
    if !closed {
        debug!(subscriber = %id, "Close timed out, dropping connection");
    }
    closed
}

/// Subscriber backed by the send half of a WebSocket
pub struct WebSocketSink {
    id: SubscriberId,
    sender: Mutex<SplitSink<WebSocket, Message>>,
    closed: CancellationToken,
}

impl WebSocketSink {
    fn new(id: SubscriberId, sender: SplitSink<WebSocket, Message>) -> Self {
        Self { id, sender: Mutex::new(sender), closed: CancellationToken::new() }
    }
}

#[async_trait]
impl SubscriberSink for WebSocketSink {
    async fn deliver(&self, message: Arc<str>) -> Result<()> {
        if self.closed.is_cancelled() {
            return Err(StreamError::delivery(self.id.get(), "connection closed"));
        }

        let mut sender = self.sender.lock().await;
        sender
            .send(Message::Text(message.to_string()))
            .await
            .map_err(|e| StreamError::delivery(self.id.get(), e.to_string()))
    }

    async fn close(&self) {
        self.closed.cancel();

        let mut sender = self.sender.lock().await;
        // The peer may already be gone
        let _ = sender.send(Message::Close(None)).await;
        let _ = sender.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingSink, StuckCloseSink};

    #[tokio::test(start_paused = true)]
    async fn close_gives_up_on_a_stuck_peer() {
        let registry = SubscriberRegistry::new();
        let stuck = Arc::new(StuckCloseSink);
        let id = registry.add(Arc::clone(&stuck) as Arc<dyn SubscriberSink>);
        let started = tokio::time::Instant::now();

        let closed = close_within(id, &*stuck, Duration::from_secs(1)).await;

        assert!(!closed);
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(started.elapsed() < Duration::from_millis(1050));
    }

    #[tokio::test]
    async fn close_reports_success() {
        let registry = SubscriberRegistry::new();
        let sink = Arc::new(RecordingSink::new());
        let id = registry.add(Arc::clone(&sink) as Arc<dyn SubscriberSink>);

        assert!(close_within(id, &*sink, Duration::from_secs(1)).await);
        assert!(sink.is_closed());
    }

    #[test]
    fn health_reflects_session_stats() {
        let stats = SessionStats {
            running: true,
            fps: 30,
            frames_emitted: 120,
            frames_skipped: 2,
            last_frame_id: Some(121),
            source_loops: 1,
            ..Default::default()
        };

        let value = serde_json::to_value(HealthResponse::from_stats(&stats, 3)).unwrap();

        assert_eq!(value["status"], "healthy");
        assert_eq!(value["subscribers"], 3);
        assert_eq!(value["frames_emitted"], 120);
        assert_eq!(value["frames_skipped"], 2);
        assert_eq!(value["last_frame_id"], 121);
        assert_eq!(value["source_loops"], 1);
        assert!(value["pacer"]["drift"].is_i64());
    }

    #[test]
    fn stopped_session_is_not_healthy() {
        let value = serde_json::to_value(HealthResponse::from_stats(&SessionStats::default(), 0)).unwrap();
        assert_eq!(value["status"], "stopped");
        assert!(value["last_frame_id"].is_null());
    }

    #[test]
    fn root_flattens_service_info() {
        let body = RootResponse {
            info: ServiceInfo {
                service: "drishti-stream-primary".to_string(),
                version: "v1.0".to_string(),
                stream_path: "/ws/stream".to_string(),
                description: "Virtual camera".to_string(),
            },
            status: "running",
        };

        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value["service"], "drishti-stream-primary");
        assert_eq!(value["stream_path"], "/ws/stream");
        assert_eq!(value["status"], "running");
    }
}
