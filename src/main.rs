use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use live_qa_service::{
    config, db, error, logging,
    middleware::RequestId,
    routes,
    state::AppState,
    store::{PgRoomStore, RoomStore},
    websocket::{EventBroadcaster, RoomRegistry},
};

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    logging::init_tracing();
    let cfg = Arc::new(config::Config::from_env()?);

    let pool = db::init_pool(&cfg).await?;
    let store: Arc<dyn RoomStore> = Arc::new(PgRoomStore::new(pool));

    let registry = RoomRegistry::new();
    let events = EventBroadcaster::new(registry.clone());

    let state = AppState {
        store,
        registry: registry.clone(),
        events,
        config: cfg.clone(),
    };

    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    tracing::info!(%bind_addr, "starting live-qa-service");

    let server = HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(RequestId::new())
            .app_data(web::Data::new(state.clone()))
            .service(routes::rooms::create_room)
            .service(routes::rooms::get_rooms)
            .service(routes::messages::create_room_message)
            .service(routes::messages::get_room_messages)
            .service(routes::messages::get_room_message)
            .service(routes::messages::react_to_message)
            .service(routes::messages::remove_message_reaction)
            .service(routes::messages::mark_message_answered)
            .service(routes::subscribe::subscribe_to_room)
            .route("/health", web::get().to(|| async { "OK" }))
    })
    .disable_signals()
    .bind(&bind_addr)
    .map_err(|e| error::AppError::StartServer(format!("bind: {e}")))?
    .run();

    tokio::select! {
        res = server => {
            res.map_err(|e| error::AppError::StartServer(format!("server: {e}")))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            // Every parked subscribe task unwinds through its cancel handle
            // so the process can exit cleanly.
            registry.shutdown().await;
        }
    }

    Ok(())
}
