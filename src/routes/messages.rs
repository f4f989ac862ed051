use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState, websocket::RoomEvent};

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReactionCountResponse {
    pub count: i64,
}

/// POST /api/rooms/{room_id}/messages
///
/// Persists the message, then fans it out to the room's live subscribers in
/// a detached task: the HTTP response never waits on the broadcast, and the
/// broadcast never fires for a message that failed to persist.
#[post("/api/rooms/{room_id}/messages")]
pub async fn create_room_message(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreateMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();

    if body.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".into()));
    }

    if !state.store.room_exists(room_id).await? {
        return Err(AppError::NotFound);
    }

    let message_id = state.store.insert_message(room_id, &body.message).await?;

    let events = state.events.clone();
    let event = RoomEvent::message_created(room_id.to_string(), message_id, body.message.clone());
    tokio::spawn(async move {
        events.publish(event).await;
    });

    Ok(HttpResponse::Created().json(CreatedResponse { id: message_id }))
}

/// GET /api/rooms/{room_id}/messages
#[get("/api/rooms/{room_id}/messages")]
pub async fn get_room_messages(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();

    if !state.store.room_exists(room_id).await? {
        return Err(AppError::NotFound);
    }

    let messages = state.store.list_messages(room_id).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// GET /api/rooms/{room_id}/messages/{message_id}
#[get("/api/rooms/{room_id}/messages/{message_id}")]
pub async fn get_room_message(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (room_id, message_id) = path.into_inner();

    let message = state
        .store
        .get_message(room_id, message_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(message))
}

/// PATCH /api/rooms/{room_id}/messages/{message_id}/react
#[patch("/api/rooms/{room_id}/messages/{message_id}/react")]
pub async fn react_to_message(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (room_id, message_id) = path.into_inner();

    let count = state
        .store
        .react_to_message(room_id, message_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(ReactionCountResponse { count }))
}

/// DELETE /api/rooms/{room_id}/messages/{message_id}/react
#[delete("/api/rooms/{room_id}/messages/{message_id}/react")]
pub async fn remove_message_reaction(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (room_id, message_id) = path.into_inner();

    let count = state
        .store
        .remove_reaction(room_id, message_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(ReactionCountResponse { count }))
}

/// PATCH /api/rooms/{room_id}/messages/{message_id}/answer
#[patch("/api/rooms/{room_id}/messages/{message_id}/answer")]
pub async fn mark_message_answered(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (room_id, message_id) = path.into_inner();

    if !state.store.mark_answered(room_id, message_id).await? {
        return Err(AppError::NotFound);
    }

    Ok(HttpResponse::NoContent().finish())
}
