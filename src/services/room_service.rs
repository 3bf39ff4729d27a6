use tracing::info;

use crate::models::{ApiError, InstrumentMap};
use crate::state::AppState;

/// Room names in creation order.
pub async fn list_rooms(state: &AppState) -> Result<Vec<String>, ApiError> {
    Ok(state.store.list_rooms().await?)
}

/// Create a room: index entry and all-free instrument map are persisted as
/// one logical unit, then the room's broadcast channel opens.
pub async fn create_room(state: &AppState, name: &str) -> Result<(), ApiError> {
    let created = state
        .store
        .insert_room(name, &InstrumentMap::default())
        .await?;
    if !created {
        return Err(ApiError::RoomAlreadyExists(name.to_string()));
    }
    state.channels.open(name).await;
    info!("created room {name}");
    Ok(())
}

/// Delete a room: index entry and instrument map go together, then the
/// channel is torn down. Joined connections just see their event stream end.
pub async fn delete_room(state: &AppState, name: &str) -> Result<(), ApiError> {
    let deleted = state.store.delete_room(name).await?;
    if !deleted {
        return Err(ApiError::RoomNotFound(name.to_string()));
    }
    state.channels.close(name).await;
    info!("deleted room {name}");
    Ok(())
}

/// Drop every room, map and channel.
pub async fn flush(state: &AppState) -> Result<(), ApiError> {
    state.store.flush().await?;
    state.channels.close_all().await;
    info!("flushed all rooms");
    Ok(())
}
