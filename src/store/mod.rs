//! Persistence contract for rooms and messages.
//!
//! The notification core and the HTTP surface only ever talk to the
//! [`RoomStore`] trait; the production implementation lives in
//! [`postgres::PgRoomStore`].

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Room, RoomMessage};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgRoomStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(e: tokio_postgres::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(e: deadpool_postgres::PoolError) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Narrow persistence contract consumed by the routes and the subscribe
/// lifecycle. Absence is reported in-band (`false` / `None`) so callers own
/// the not-found policy; `StoreError` is reserved for backend failures.
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn insert_room(&self, theme: &str) -> Result<Uuid, StoreError>;

    async fn list_rooms(&self) -> Result<Vec<Room>, StoreError>;

    async fn room_exists(&self, room_id: Uuid) -> Result<bool, StoreError>;

    async fn insert_message(&self, room_id: Uuid, message: &str) -> Result<Uuid, StoreError>;

    async fn list_messages(&self, room_id: Uuid) -> Result<Vec<RoomMessage>, StoreError>;

    async fn get_message(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<RoomMessage>, StoreError>;

    /// Increment the reaction count; returns the new count, `None` when the
    /// message does not exist in that room.
    async fn react_to_message(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<i64>, StoreError>;

    /// Decrement the reaction count, saturating at zero.
    async fn remove_reaction(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<i64>, StoreError>;

    /// Returns `false` when the message does not exist in that room.
    async fn mark_answered(&self, room_id: Uuid, message_id: Uuid) -> Result<bool, StoreError>;
}
