use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::{ApiError, InstrumentStates};
use crate::services::reservation_service;
use crate::state::AppState;

/// Current reservation map for a room
pub async fn list_instruments(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<InstrumentStates>, ApiError> {
    Ok(Json(reservation_service::instruments(&state, &room).await?))
}

/// Reserve an instrument in a room
pub async fn reserve_instrument(
    State(state): State<Arc<AppState>>,
    Path((room, instrument)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    reservation_service::reserve(&state, &room, &instrument).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Release an instrument in a room
pub async fn release_instrument(
    State(state): State<Arc<AppState>>,
    Path((room, instrument)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    reservation_service::release(&state, &room, &instrument).await?;
    Ok(StatusCode::NO_CONTENT)
}
