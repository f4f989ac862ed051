//! Fan-out of room events to live subscribers.

use super::{RoomEvent, RoomRegistry};

/// Delivers one event to every current subscriber of its target room.
///
/// The dispatcher never mutates the registry. A failed delivery fires that
/// subscriber's cancellation handle; the owning subscribe task reacts by
/// detaching, keeping removal in one place.
#[derive(Clone)]
pub struct EventBroadcaster {
    registry: RoomRegistry,
}

impl EventBroadcaster {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    /// Best-effort broadcast; has no failure return. Publishing to a room
    /// with no listeners is normal and returns immediately.
    pub async fn publish(&self, event: RoomEvent) {
        let subscribers = self.registry.snapshot(&event.room_id).await;
        if subscribers.is_empty() {
            return;
        }

        let payload = match serde_json::to_string(&event.kind) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, room_id = %event.room_id, "failed to serialize event");
                return;
            }
        };

        // Snapshot taken above: the delivery loop runs without the registry
        // lock, so one slow or dead connection cannot stall attach/detach.
        for subscriber in subscribers {
            if subscriber.sender.send(payload.clone()).is_err() {
                tracing::warn!(
                    room_id = %event.room_id,
                    subscriber_id = ?subscriber.id,
                    "failed to deliver event, cancelling subscriber"
                );
                subscriber.cancel.cancel();
            }
        }
    }
}
