//! Room-scoped events fanned out to live subscribers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload actually written to subscribers. Adjacently tagged so the wire
/// shape is `{"kind": "...", "value": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value")]
pub enum RoomEventKind {
    #[serde(rename = "message")]
    MessageCreated { id: String, message: String },
}

/// An event targeted at one room. The room id is routing metadata only and
/// is never serialized to subscribers.
#[derive(Debug, Clone)]
pub struct RoomEvent {
    pub room_id: String,
    pub kind: RoomEventKind,
}

impl RoomEvent {
    pub fn message_created(room_id: String, message_id: Uuid, message: String) -> Self {
        Self {
            room_id,
            kind: RoomEventKind::MessageCreated {
                id: message_id.to_string(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_created_wire_format() {
        let kind = RoomEventKind::MessageCreated {
            id: "m1".to_string(),
            message: "hi".to_string(),
        };

        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, r#"{"kind":"message","value":{"id":"m1","message":"hi"}}"#);
    }

    #[test]
    fn room_id_is_not_part_of_the_payload() {
        let event = RoomEvent::message_created(
            "29c9b1b7-7d58-4be1-9a43-77b0a1d26e2d".to_string(),
            Uuid::new_v4(),
            "hello".to_string(),
        );

        let json = serde_json::to_string(&event.kind).unwrap();
        assert!(!json.contains(&event.room_id));
    }

    #[test]
    fn wire_format_round_trips() {
        let json = r#"{"kind":"message","value":{"id":"m1","message":"hi"}}"#;
        let kind: RoomEventKind = serde_json::from_str(json).unwrap();
        assert_eq!(
            kind,
            RoomEventKind::MessageCreated {
                id: "m1".to_string(),
                message: "hi".to_string(),
            }
        );
    }
}
