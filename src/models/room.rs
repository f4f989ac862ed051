use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// A Q&A room. Rooms live for the lifetime of the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub theme: String,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            theme: row.get("theme"),
            created_at: row.get("created_at"),
        }
    }
}
