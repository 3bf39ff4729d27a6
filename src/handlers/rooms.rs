use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::ApiError;
use crate::services::room_service;
use crate::state::AppState;

/// List every room, in creation order
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(room_service::list_rooms(&state).await?))
}

/// Create a room and open its broadcast channel
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    room_service::create_room(&state, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a room and tear its broadcast channel down
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    room_service::delete_room(&state, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}
