use crate::models::{ApiError, Instrument, InstrumentMap, InstrumentStates, Reservation, RoomEvent};
use crate::state::AppState;

/// Current reservation states for a room.
pub async fn instruments(state: &AppState, room: &str) -> Result<InstrumentStates, ApiError> {
    let map = state
        .store
        .load_instruments(room)
        .await?
        .ok_or_else(|| ApiError::RoomNotFound(room.to_string()))?;
    Ok(map.states())
}

/// Reserve an instrument in a room.
///
/// The whole read-validate-write-emit sequence runs under the room's write
/// lock, so concurrent reservations of the same instrument get exactly one
/// winner. On success the room's channel sees `instrumentReserved` followed
/// by `instrumentsChanged` before the lock is released.
pub async fn reserve(
    state: &AppState,
    room: &str,
    instrument: &str,
) -> Result<InstrumentStates, ApiError> {
    let Some(_guard) = state.channels.lock(room).await else {
        return Err(ApiError::RoomNotFound(room.to_string()));
    };
    // Room existence is checked before the instrument id
    let mut map = state
        .store
        .load_instruments(room)
        .await?
        .ok_or_else(|| ApiError::RoomNotFound(room.to_string()))?;
    let instrument = parse_instrument(instrument)?;

    if map.slot(instrument).is_reserved() {
        return Err(ApiError::InstrumentNotAvailable(instrument));
    }
    // The holder is attached later, when a connection claims the reservation
    *map.slot_mut(instrument) = Reservation::Reserved { holder: None };
    persist(state, room, &map).await?;

    state
        .channels
        .emit(room, RoomEvent::InstrumentReserved { instrument })
        .await;
    state
        .channels
        .emit(
            room,
            RoomEvent::InstrumentsChanged {
                instruments: map.states(),
            },
        )
        .await;

    Ok(map.states())
}

/// Release an instrument in a room. Symmetric to [`reserve`].
pub async fn release(
    state: &AppState,
    room: &str,
    instrument: &str,
) -> Result<InstrumentStates, ApiError> {
    let Some(_guard) = state.channels.lock(room).await else {
        return Err(ApiError::RoomNotFound(room.to_string()));
    };
    let mut map = state
        .store
        .load_instruments(room)
        .await?
        .ok_or_else(|| ApiError::RoomNotFound(room.to_string()))?;
    let instrument = parse_instrument(instrument)?;

    if !map.slot(instrument).is_reserved() {
        return Err(ApiError::InstrumentNotReserved(instrument));
    }
    *map.slot_mut(instrument) = Reservation::Free;
    persist(state, room, &map).await?;

    state
        .channels
        .emit(room, RoomEvent::InstrumentReleased { instrument })
        .await;
    state
        .channels
        .emit(
            room,
            RoomEvent::InstrumentsChanged {
                instruments: map.states(),
            },
        )
        .await;

    Ok(map.states())
}

fn parse_instrument(raw: &str) -> Result<Instrument, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::InstrumentNotFound(raw.to_string()))
}

async fn persist(state: &AppState, room: &str, map: &InstrumentMap) -> Result<(), ApiError> {
    if !state.store.save_instruments(room, map).await? {
        // The room was deleted while we were holding its lock
        return Err(ApiError::RoomNotFound(room.to_string()));
    }
    Ok(())
}
