//! WebSocket subscribe lifecycle.
//!
//! One subscription attempt moves linearly through: room validation (404
//! before any registry mutation), upgrade, attach, parked delivery loop,
//! cancellation (client close, delivery failure, or shutdown), detach.
//! There is no reconnect logic; a reconnecting client starts over with a
//! fresh request.

use std::time::{Duration, Instant};

use actix::{
    Actor, ActorContext, Addr, AsyncContext, Handler, Message as ActixMessage, StreamHandler,
};
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::{
    error::AppError,
    state::AppState,
    websocket::{CancelHandle, RoomRegistry, SubscriberId},
};

/// Ping cadence for idle connections.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
/// A peer silent for this long is considered gone.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(ActixMessage)]
#[rtype(result = "()")]
struct Deliver(String);

#[derive(ActixMessage)]
#[rtype(result = "()")]
struct CloseSession;

/// WebSocket actor for one room subscriber. The actor only owns the socket;
/// registry membership is owned by the forwarder task spawned in
/// [`subscribe_to_room`].
struct RoomSession {
    room_id: String,
    cancel: CancelHandle,
    hb: Instant,
}

impl RoomSession {
    fn new(room_id: String, cancel: CancelHandle) -> Self {
        Self {
            room_id,
            cancel,
            hb: Instant::now(),
        }
    }

    fn heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                tracing::warn!(room_id = %act.room_id, "websocket heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for RoomSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(room_id = %self.room_id, "websocket session stopped");
        // Client close and transport write failure both land here; the
        // forwarder task observes the signal and detaches.
        self.cancel.cancel();
    }
}

impl Handler<Deliver> for RoomSession {
    type Result = ();

    fn handle(&mut self, msg: Deliver, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl Handler<CloseSession> for RoomSession {
    type Result = ();

    fn handle(&mut self, _msg: CloseSession, ctx: &mut Self::Context) {
        ctx.close(None);
        ctx.stop();
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for RoomSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.hb = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(_)) | Ok(ws::Message::Binary(_)) => {
                // Subscribers are listen-only; inbound payloads are ignored.
                tracing::debug!(room_id = %self.room_id, "ignoring inbound websocket payload");
            }
            Ok(ws::Message::Close(reason)) => {
                tracing::debug!(room_id = %self.room_id, ?reason, "websocket close received");
                ctx.stop();
            }
            Err(e) => {
                tracing::warn!(room_id = %self.room_id, error = %e, "websocket protocol error");
                ctx.stop();
            }
            _ => {}
        }
    }
}

/// Bridge the registry's delivery channel to the session actor, parked until
/// the cancellation signal fires or the channel closes. Detach follows
/// cancellation, never the other way around.
async fn run_subscriber(
    registry: RoomRegistry,
    room_id: String,
    subscriber_id: SubscriberId,
    mut rx: UnboundedReceiver<String>,
    cancel: CancelHandle,
    addr: Addr<RoomSession>,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            delivered = rx.recv() => match delivered {
                Some(payload) => addr.do_send(Deliver(payload)),
                None => break,
            },
        }
    }

    // Detach always follows cancellation, whichever exit path ran.
    cancel.cancel();
    registry.detach(&room_id, subscriber_id).await;
    addr.do_send(CloseSession);
    tracing::info!(room_id = %room_id, "unsubscribed from room");
}

/// GET /subscribe/{room_id}
#[get("/subscribe/{room_id}")]
pub async fn subscribe_to_room(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, Error> {
    let room_id = path.into_inner();

    // Validate before upgrading: an unknown room terminates the request
    // with 404 and never touches the registry.
    if !state
        .store
        .room_exists(room_id)
        .await
        .map_err(AppError::from)?
    {
        return Err(AppError::NotFound.into());
    }

    let room_key = room_id.to_string();
    let cancel = CancelHandle::new();
    let session = RoomSession::new(room_key.clone(), cancel.clone());

    // Upgrade before attach: a failed handshake must leave the registry
    // untouched.
    let (addr, resp) = ws::WsResponseBuilder::new(session, &req, stream).start_with_addr()?;

    let (subscriber_id, rx) = state.registry.attach(&room_key, cancel.clone()).await;
    tracing::info!(
        room_id = %room_key,
        client_addr = ?req.peer_addr(),
        "subscribed to room"
    );

    let registry = state.registry.clone();
    tokio::spawn(run_subscriber(
        registry,
        room_key,
        subscriber_id,
        rx,
        cancel,
        addr,
    ));

    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryRoomStore;
    use crate::websocket::{EventBroadcaster, RoomRegistry};
    use actix_web::{test, App};
    use std::sync::Arc;

    fn test_state() -> AppState {
        let registry = RoomRegistry::new();
        AppState {
            store: Arc::new(MemoryRoomStore::new()),
            registry: registry.clone(),
            events: EventBroadcaster::new(registry),
            config: Arc::new(crate::config::Config {
                database_url: String::new(),
                port: 0,
                db_max_connections: 1,
            }),
        }
    }

    #[actix_web::test]
    async fn subscribe_to_unknown_room_is_rejected_without_registry_mutation() {
        let state = test_state();
        let registry = state.registry.clone();
        let room_id = Uuid::new_v4();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(subscribe_to_room),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/subscribe/{room_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
        assert_eq!(registry.subscriber_count(&room_id.to_string()).await, 0);
    }

    #[actix_web::test]
    async fn subscribe_with_invalid_room_id_is_a_client_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(subscribe_to_room),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/subscribe/not-a-uuid")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }

    #[actix_web::test]
    async fn failed_upgrade_leaves_the_registry_untouched() {
        // Plain GET without websocket handshake headers.
        let state = test_state();
        let registry = state.registry.clone();
        let room_id = state.store.insert_room("ama").await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(subscribe_to_room),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/subscribe/{room_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_client_error());
        assert_eq!(registry.subscriber_count(&room_id.to_string()).await, 0);
    }
}
