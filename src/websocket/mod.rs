//! Real-time room notification core.
//!
//! [`RoomRegistry`] tracks which live connections are subscribed to which
//! rooms; [`broadcast::EventBroadcaster`] fans room events out to them. The
//! registry is the only shared mutable state in the core, guarded by a
//! single mutex, and no delivery attempt ever runs while that mutex is held.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    Mutex,
};
use uuid::Uuid;

pub mod broadcast;
pub mod cancel;
pub mod events;

pub use broadcast::EventBroadcaster;
pub use cancel::CancelHandle;
pub use events::{RoomEvent, RoomEventKind};

/// Unique identifier for one live subscription. Allocated on attach, used
/// for precise removal when the connection unwinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

struct RoomSubscriber {
    id: SubscriberId,
    sender: UnboundedSender<String>,
    cancel: CancelHandle,
}

/// Snapshot entry handed to the dispatcher: enough to attempt one delivery
/// and to signal cancellation if it fails. Never a registry reference.
#[derive(Clone)]
pub struct SubscriberHandle {
    pub id: SubscriberId,
    pub sender: UnboundedSender<String>,
    pub cancel: CancelHandle,
}

/// Registry of live subscribers per room.
///
/// Room buckets are created lazily on first attach and deliberately left in
/// place once empty: rooms persist for the service lifetime, so the handful
/// of empty vectors is not worth a cleanup protocol.
#[derive(Default, Clone)]
pub struct RoomRegistry {
    inner: Arc<Mutex<HashMap<String, Vec<RoomSubscriber>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber for a room. Infallible; the subscriber is
    /// eligible for delivery as soon as this returns. The returned receiver
    /// is the subscriber's delivery channel.
    pub async fn attach(
        &self,
        room_id: &str,
        cancel: CancelHandle,
    ) -> (SubscriberId, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        let id = SubscriberId::new();

        let mut guard = self.inner.lock().await;
        let bucket = guard.entry(room_id.to_string()).or_default();
        bucket.push(RoomSubscriber {
            id,
            sender: tx,
            cancel,
        });

        tracing::debug!(
            room_id,
            subscriber_id = ?id,
            subscribers = bucket.len(),
            "attached subscriber"
        );

        (id, rx)
    }

    /// Remove a subscriber from a room. Idempotent: detaching an already
    /// absent subscriber (or an unknown room) is a no-op.
    pub async fn detach(&self, room_id: &str, id: SubscriberId) {
        let mut guard = self.inner.lock().await;
        if let Some(bucket) = guard.get_mut(room_id) {
            let before = bucket.len();
            bucket.retain(|s| s.id != id);
            if bucket.len() != before {
                tracing::debug!(
                    room_id,
                    subscriber_id = ?id,
                    remaining = bucket.len(),
                    "detached subscriber"
                );
            }
        }
    }

    /// Copy the current subscribers of a room out for iteration, so the
    /// dispatch loop runs without holding the registry lock.
    pub async fn snapshot(&self, room_id: &str) -> Vec<SubscriberHandle> {
        let guard = self.inner.lock().await;
        guard
            .get(room_id)
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|s| SubscriberHandle {
                        id: s.id,
                        sender: s.sender.clone(),
                        cancel: s.cancel.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Cancel every outstanding subscriber. The registry's full content is
    /// the complete worklist at process shutdown; each subscribe task then
    /// unwinds and detaches itself.
    pub async fn shutdown(&self) {
        let guard = self.inner.lock().await;
        let mut cancelled = 0usize;
        for bucket in guard.values() {
            for subscriber in bucket {
                subscriber.cancel.cancel();
                cancelled += 1;
            }
        }
        tracing::info!(cancelled, "cancelled all subscribers for shutdown");
    }

    pub async fn subscriber_count(&self, room_id: &str) -> usize {
        let guard = self.inner.lock().await;
        guard.get(room_id).map(Vec::len).unwrap_or(0)
    }
}
