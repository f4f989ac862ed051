use std::sync::Arc;

use crate::{
    config::Config,
    store::RoomStore,
    websocket::{EventBroadcaster, RoomRegistry},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RoomStore>,
    pub registry: RoomRegistry,
    pub events: EventBroadcaster,
    pub config: Arc<Config>,
}
