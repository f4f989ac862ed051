use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub theme: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

/// POST /api/rooms
#[post("/api/rooms")]
pub async fn create_room(
    state: web::Data<AppState>,
    body: web::Json<CreateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    if body.theme.trim().is_empty() {
        return Err(AppError::BadRequest("theme must not be empty".into()));
    }

    let id = state.store.insert_room(&body.theme).await?;
    tracing::info!(room_id = %id, "room created");

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// GET /api/rooms
#[get("/api/rooms")]
pub async fn get_rooms(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let rooms = state.store.list_rooms().await?;
    Ok(HttpResponse::Ok().json(rooms))
}
