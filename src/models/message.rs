use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// An audience question posted into a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomMessage {
    pub id: Uuid,
    pub room_id: Uuid,
    pub message: String,
    pub reaction_count: i64,
    pub answered: bool,
    pub created_at: DateTime<Utc>,
}

impl RoomMessage {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            room_id: row.get("room_id"),
            message: row.get("message"),
            reaction_count: row.get("reaction_count"),
            answered: row.get("answered"),
            created_at: row.get("created_at"),
        }
    }
}
