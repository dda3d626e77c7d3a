//! Concurrent fan-out of one message to every subscriber
//!
//! Each broadcast works on a registry snapshot taken when it starts. Deliveries run
//! concurrently, each bounded by the delivery timeout, and settle independently:
//! a failure is a value in the outcome list, never an early return. Failed
//! subscribers are removed in one batch after every delivery has settled.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::StreamError;
use crate::registry::{SubscriberId, SubscriberRegistry};

/// Default bound on a single delivery
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(1);

/// Outcome of one broadcast
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers in the snapshot
    pub attempted: usize,
    /// Deliveries that completed in time
    pub delivered: usize,
    /// Subscribers this broadcast removed because their delivery failed or timed out
    ///
    /// A failed subscriber that already left the registry is not listed.
    pub evicted: Vec<SubscriberId>,
}

/// Delivers messages to the registry's subscribers
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<SubscriberRegistry>,
    delivery_timeout: Duration,
}

impl Broadcaster {
    /// Fan out to `registry`, bounding each delivery by `delivery_timeout`
    pub fn new(registry: Arc<SubscriberRegistry>, delivery_timeout: Duration) -> Self {
        Self { registry, delivery_timeout }
    }

    /// Registry the broadcaster snapshots and evicts from
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Bound on a single delivery
    pub fn delivery_timeout(&self) -> Duration {
        self.delivery_timeout
    }

    /// Deliver `message` to everyone registered right now
    ///
    /// Returns after every delivery has settled, which takes at most the delivery
    /// timeout. Subscribers that join while this runs get the next message.
    pub async fn broadcast(&self, message: Arc<str>) -> BroadcastReport {
        let subscribers = self.registry.snapshot();
        if subscribers.is_empty() {
            return BroadcastReport::default();
        }

        let deliveries = subscribers.iter().map(|(id, sink)| {
            let message = Arc::clone(&message);
            async move {
                let outcome = match timeout(self.delivery_timeout, sink.deliver(message)).await {
                    Ok(result) => result,
                    Err(_) => Err(StreamError::Timeout { duration: self.delivery_timeout }),
                };
                (*id, outcome)
            }
        });

        let outcomes = join_all(deliveries).await;

        let mut failed = Vec::new();
        for (id, outcome) in outcomes {
            if let Err(error) = outcome {
                warn!(subscriber = %id, error = %error, "Delivery failed, evicting subscriber");
                failed.push(id);
            }
        }

        let attempted = subscribers.len();
        let delivered = attempted - failed.len();

        // A disconnect handler may have removed some of them first; only count our own removals
        let removed = self.registry.remove_many(&failed);
        let evicted: Vec<SubscriberId> = removed.iter().map(|(id, _)| *id).collect();
        for (id, sink) in removed {
            // Close off the pacing path; a stuck transport must not hold up the next tick
            let limit = self.delivery_timeout;
            tokio::spawn(async move {
                if timeout(limit, sink.close()).await.is_err() {
                    debug!(subscriber = %id, "Close of evicted subscriber timed out");
                }
            });
        }

        debug!(attempted, delivered, evicted = evicted.len(), "Broadcast settled");
        BroadcastReport { attempted, delivered, evicted }
    }
}
