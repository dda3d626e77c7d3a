//! Subscriber registry
//!
//! The registry owns every live output channel. It is the only state mutated from
//! more than one task (the broadcaster evicts, each connection handler joins and
//! leaves), so every membership change goes through its lock, and the lock is
//! never held across I/O: the broadcaster works from a [`snapshot`] instead.
//!
//! ```text
//!   connection task ──add()──┐          ┌──snapshot()── Broadcaster
//!   connection task ──remove()─► Registry ◄──remove_many()──┘
//! ```
//!
//! [`snapshot`]: SubscriberRegistry::snapshot

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::Result;

/// Identity of one registered subscriber
///
/// Ids are allocated in join order and never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Raw numeric id
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output channel of one consumer
///
/// Implementations push a serialized message to their peer. The broadcaster
/// bounds every call with its delivery timeout and drops the future on expiry,
/// so implementations need not time out themselves.
#[async_trait]
pub trait SubscriberSink: Send + Sync + 'static {
    /// Deliver one message
    async fn deliver(&self, message: Arc<str>) -> Result<()>;

    /// Close the channel; called once when the subscriber is removed by the server
    async fn close(&self);
}

/// Point-in-time member of the registry
pub type Subscriber = (SubscriberId, Arc<dyn SubscriberSink>);

/// Counters for observability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryStats {
    /// Currently registered
    pub active: usize,
    /// Registered since creation
    pub joined_total: u64,
    /// Removed since creation (disconnect, eviction or shutdown)
    pub removed_total: u64,
}

/// Thread-safe set of active output channels
pub struct SubscriberRegistry {
    members: RwLock<BTreeMap<SubscriberId, Arc<dyn SubscriberSink>>>,
    next_id: AtomicU64,
    joined_total: AtomicU64,
    removed_total: AtomicU64,
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriberRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            members: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            joined_total: AtomicU64::new(0),
            removed_total: AtomicU64::new(0),
        }
    }

    // A panic while holding the lock cannot leave the map half-updated: every
    // critical section is a single BTreeMap call.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<SubscriberId, Arc<dyn SubscriberSink>>> {
        self.members.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<SubscriberId, Arc<dyn SubscriberSink>>> {
        self.members.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a channel
    ///
    /// The channel only sees broadcasts whose snapshot is taken after this returns.
    pub fn add(&self, sink: Arc<dyn SubscriberSink>) -> SubscriberId {
        self.add_with(|_| sink)
    }

    /// Register a channel that needs to know its own id
    pub fn add_with<F>(&self, make: F) -> SubscriberId
    where
        F: FnOnce(SubscriberId) -> Arc<dyn SubscriberSink>,
    {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let sink = make(id);
        let active = {
            let mut members = self.write();
            members.insert(id, sink);
            members.len()
        };
        self.joined_total.fetch_add(1, Ordering::Relaxed);

        info!(subscriber = %id, subscribers = active, "Subscriber added");
        id
    }

    /// Deregister a channel
    ///
    /// Idempotent: unknown or already-removed ids return `None` and change nothing.
    pub fn remove(&self, id: SubscriberId) -> Option<Arc<dyn SubscriberSink>> {
        let (removed, active) = {
            let mut members = self.write();
            let removed = members.remove(&id);
            (removed, members.len())
        };

        if removed.is_some() {
            self.removed_total.fetch_add(1, Ordering::Relaxed);
            info!(subscriber = %id, subscribers = active, "Subscriber removed");
        } else {
            debug!(subscriber = %id, "Subscriber already removed");
        }
        removed
    }

    /// Deregister several channels under one lock acquisition
    ///
    /// Returns the channels that were still registered.
    pub fn remove_many(&self, ids: &[SubscriberId]) -> Vec<Subscriber> {
        if ids.is_empty() {
            return Vec::new();
        }

        let removed: Vec<Subscriber> = {
            let mut members = self.write();
            ids.iter().filter_map(|id| members.remove(id).map(|sink| (*id, sink))).collect()
        };

        self.removed_total.fetch_add(removed.len() as u64, Ordering::Relaxed);
        removed
    }

    /// Remove and return every channel
    pub fn drain(&self) -> Vec<Subscriber> {
        let drained: Vec<Subscriber> = std::mem::take(&mut *self.write()).into_iter().collect();
        self.removed_total.fetch_add(drained.len() as u64, Ordering::Relaxed);
        drained
    }

    /// Copy of the current membership, in join order
    pub fn snapshot(&self) -> Vec<Subscriber> {
        self.read().iter().map(|(id, sink)| (*id, Arc::clone(sink))).collect()
    }

    /// Whether an id is currently registered
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.read().contains_key(&id)
    }

    /// Current number of channels
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Membership counters
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            active: self.count(),
            joined_total: self.joined_total.load(Ordering::Relaxed),
            removed_total: self.removed_total.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingSink;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::thread;

    fn sink() -> Arc<dyn SubscriberSink> {
        Arc::new(RecordingSink::new())
    }

    #[test]
    fn add_and_snapshot_in_join_order() {
        let registry = SubscriberRegistry::new();
        let a = registry.add(sink());
        let b = registry.add(sink());
        let c = registry.add(sink());

        let ids: Vec<SubscriberId> = registry.snapshot().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(registry.count(), 3);
    }

    #[test]
    fn removal_is_idempotent() {
        let registry = SubscriberRegistry::new();
        let keep = registry.add(sink());
        let gone = registry.add(sink());

        assert!(registry.remove(gone).is_some());
        assert!(registry.remove(gone).is_none());
        assert!(registry.remove(gone).is_none());

        assert_eq!(registry.count(), 1);
        assert!(registry.contains(keep));
        assert_eq!(registry.stats(), RegistryStats { active: 1, joined_total: 2, removed_total: 1 });
    }

    #[test]
    fn remove_many_skips_unknown_ids() {
        let registry = SubscriberRegistry::new();
        let a = registry.add(sink());
        let b = registry.add(sink());
        registry.remove(a);

        let removed = registry.remove_many(&[a, b, b]);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].0, b);
        assert_eq!(registry.count(), 0);
        assert_eq!(registry.stats().removed_total, 2);
    }

    #[test]
    fn snapshot_is_detached_from_later_changes() {
        let registry = SubscriberRegistry::new();
        let a = registry.add(sink());
        let snapshot = registry.snapshot();

        registry.remove(a);
        registry.add(sink());

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, a);
    }

    #[test]
    fn drain_empties_the_registry() {
        let registry = SubscriberRegistry::new();
        registry.add(sink());
        registry.add(sink());

        assert_eq!(registry.drain().len(), 2);
        assert_eq!(registry.count(), 0);
        assert!(registry.drain().is_empty());
    }

    /// 100 adds and 100 removes racing 50 snapshots. Each worker publishes an id
    /// only after its call returned; each snapshotter reads the published ids
    /// before taking its snapshot. Completed removals must be absent and completed
    /// adds present.
    #[test]
    fn concurrent_membership_changes_are_atomic() {
        let registry = Arc::new(SubscriberRegistry::new());
        let initial: Vec<SubscriberId> = (0..100).map(|_| registry.add(sink())).collect();

        let added = Arc::new(Mutex::new(Vec::new()));
        let removed = Arc::new(Mutex::new(Vec::new()));
        let mut handles = Vec::new();

        for id in initial.clone() {
            let registry = Arc::clone(&registry);
            let removed = Arc::clone(&removed);
            handles.push(thread::spawn(move || {
                registry.remove(id);
                removed.lock().unwrap().push(id);
            }));
        }

        for _ in 0..100 {
            let registry = Arc::clone(&registry);
            let added = Arc::clone(&added);
            handles.push(thread::spawn(move || {
                let id = registry.add(sink());
                added.lock().unwrap().push(id);
            }));
        }

        for _ in 0..50 {
            let registry = Arc::clone(&registry);
            let added = Arc::clone(&added);
            let removed = Arc::clone(&removed);
            handles.push(thread::spawn(move || {
                let done_adds: Vec<SubscriberId> = added.lock().unwrap().clone();
                let done_removes: Vec<SubscriberId> = removed.lock().unwrap().clone();

                let snapshot: HashSet<SubscriberId> =
                    registry.snapshot().into_iter().map(|(id, _)| id).collect();

                for id in done_removes {
                    assert!(!snapshot.contains(&id), "removed subscriber {id} still in snapshot");
                }
                for id in done_adds {
                    assert!(snapshot.contains(&id), "added subscriber {id} missing from snapshot");
                }
            }));
        }

        for handle in handles {
            handle.join().expect("worker panicked");
        }

        let final_ids: HashSet<SubscriberId> =
            registry.snapshot().into_iter().map(|(id, _)| id).collect();
        let expected: HashSet<SubscriberId> = added.lock().unwrap().iter().copied().collect();
        assert_eq!(final_ids, expected);
        assert_eq!(registry.count(), 100);
        assert!(initial.iter().all(|id| !registry.contains(*id)));
    }
}
