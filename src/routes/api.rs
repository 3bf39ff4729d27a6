use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{
    create_room, delete_room, diagnostics, flush, health_check, list_instruments, list_rooms,
    release_instrument, reserve_instrument,
};
use crate::state::AppState;
use crate::ws::handler::room_channel;

/// Create API routes
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/flush", get(flush))
        .route("/diagnostics", get(diagnostics))
        .route("/rooms", get(list_rooms))
        .route("/rooms/:name", post(create_room).delete(delete_room))
        .route("/rooms/:name/instruments", get(list_instruments))
        .route(
            "/rooms/:name/instruments/:instrument",
            post(reserve_instrument).delete(release_instrument),
        )
        .route("/rooms/:name/channel", get(room_channel))
        .with_state(state)
}
