use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::models::ApiError;
use crate::services::room_service;
use crate::state::AppState;

/// Tear down every room, its instrument state and its channel.
///
/// Administrative/test-only surface; kept on GET as deployed clients expect.
pub async fn flush(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    warn!("flushing all rooms");
    room_service::flush(&state).await?;
    Ok(StatusCode::NO_CONTENT)
}
