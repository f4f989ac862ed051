//! In-memory `RoomStore` used by the route tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{Room, RoomMessage};

use super::{RoomStore, StoreError};

#[derive(Default)]
pub struct MemoryRoomStore {
    rooms: Mutex<HashMap<Uuid, Room>>,
    messages: Mutex<Vec<RoomMessage>>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn insert_room(&self, theme: &str) -> Result<Uuid, StoreError> {
        let room = Room {
            id: Uuid::new_v4(),
            theme: theme.to_string(),
            created_at: Utc::now(),
        };
        let id = room.id;
        self.rooms.lock().unwrap().insert(id, room);
        Ok(id)
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        Ok(self.rooms.lock().unwrap().values().cloned().collect())
    }

    async fn room_exists(&self, room_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.rooms.lock().unwrap().contains_key(&room_id))
    }

    async fn insert_message(&self, room_id: Uuid, message: &str) -> Result<Uuid, StoreError> {
        let msg = RoomMessage {
            id: Uuid::new_v4(),
            room_id,
            message: message.to_string(),
            reaction_count: 0,
            answered: false,
            created_at: Utc::now(),
        };
        let id = msg.id;
        self.messages.lock().unwrap().push(msg);
        Ok(id)
    }

    async fn list_messages(&self, room_id: Uuid) -> Result<Vec<RoomMessage>, StoreError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn get_message(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<RoomMessage>, StoreError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == message_id && m.room_id == room_id)
            .cloned())
    }

    async fn react_to_message(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<i64>, StoreError> {
        let mut messages = self.messages.lock().unwrap();
        Ok(messages
            .iter_mut()
            .find(|m| m.id == message_id && m.room_id == room_id)
            .map(|m| {
                m.reaction_count += 1;
                m.reaction_count
            }))
    }

    async fn remove_reaction(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<i64>, StoreError> {
        let mut messages = self.messages.lock().unwrap();
        Ok(messages
            .iter_mut()
            .find(|m| m.id == message_id && m.room_id == room_id)
            .map(|m| {
                m.reaction_count = (m.reaction_count - 1).max(0);
                m.reaction_count
            }))
    }

    async fn mark_answered(&self, room_id: Uuid, message_id: Uuid) -> Result<bool, StoreError> {
        let mut messages = self.messages.lock().unwrap();
        match messages
            .iter_mut()
            .find(|m| m.id == message_id && m.room_id == room_id)
        {
            Some(m) => {
                m.answered = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
