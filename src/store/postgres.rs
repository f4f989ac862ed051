use async_trait::async_trait;
use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::models::{Room, RoomMessage};

use super::{RoomStore, StoreError};

/// `RoomStore` backed by PostgreSQL. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgRoomStore {
    pool: Pool,
}

impl PgRoomStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomStore for PgRoomStore {
    async fn insert_room(&self, theme: &str) -> Result<Uuid, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "INSERT INTO rooms (theme) VALUES ($1) RETURNING id",
                &[&theme],
            )
            .await?;
        Ok(row.get("id"))
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT id, theme, created_at FROM rooms ORDER BY created_at DESC",
                &[],
            )
            .await?;
        Ok(rows.iter().map(Room::from_row).collect())
    }

    async fn room_exists(&self, room_id: Uuid) -> Result<bool, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT id FROM rooms WHERE id = $1", &[&room_id])
            .await?;
        Ok(row.is_some())
    }

    async fn insert_message(&self, room_id: Uuid, message: &str) -> Result<Uuid, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "INSERT INTO messages (room_id, message) VALUES ($1, $2) RETURNING id",
                &[&room_id, &message],
            )
            .await?;
        Ok(row.get("id"))
    }

    async fn list_messages(&self, room_id: Uuid) -> Result<Vec<RoomMessage>, StoreError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                r#"
                SELECT id, room_id, message, reaction_count, answered, created_at
                FROM messages
                WHERE room_id = $1
                ORDER BY created_at ASC
                "#,
                &[&room_id],
            )
            .await?;
        Ok(rows.iter().map(RoomMessage::from_row).collect())
    }

    async fn get_message(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<RoomMessage>, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, room_id, message, reaction_count, answered, created_at
                FROM messages
                WHERE id = $1 AND room_id = $2
                "#,
                &[&message_id, &room_id],
            )
            .await?;
        Ok(row.as_ref().map(RoomMessage::from_row))
    }

    async fn react_to_message(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<i64>, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                UPDATE messages
                SET reaction_count = reaction_count + 1
                WHERE id = $1 AND room_id = $2
                RETURNING reaction_count
                "#,
                &[&message_id, &room_id],
            )
            .await?;
        Ok(row.map(|r| r.get("reaction_count")))
    }

    async fn remove_reaction(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<i64>, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                UPDATE messages
                SET reaction_count = GREATEST(reaction_count - 1, 0)
                WHERE id = $1 AND room_id = $2
                RETURNING reaction_count
                "#,
                &[&message_id, &room_id],
            )
            .await?;
        Ok(row.map(|r| r.get("reaction_count")))
    }

    async fn mark_answered(&self, room_id: Uuid, message_id: Uuid) -> Result<bool, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                UPDATE messages
                SET answered = TRUE
                WHERE id = $1 AND room_id = $2
                RETURNING id
                "#,
                &[&message_id, &room_id],
            )
            .await?;
        Ok(row.is_some())
    }
}
