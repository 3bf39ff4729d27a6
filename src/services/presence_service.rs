use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{Instrument, Reservation, RoomEvent};
use crate::state::AppState;

/// Record that `connection` holds `instrument`.
///
/// Sent by a client after its reserve request succeeded. Ownership lives in
/// the persisted map itself, so a claim never flips a slot between free and
/// reserved: it only attaches the connection to an already reserved slot. A
/// connection holds at most one instrument, so any previous claim is
/// detached first (that slot stays reserved, just unowned).
pub async fn claim(state: &AppState, room: &str, connection: Uuid, instrument: Instrument) {
    let Some(_guard) = state.channels.lock(room).await else {
        debug!("claim for {instrument} in unknown room {room}");
        return;
    };
    let mut map = match state.store.load_instruments(room).await {
        Ok(Some(map)) => map,
        Ok(None) => {
            debug!("claim for {instrument} in vanished room {room}");
            return;
        }
        Err(e) => {
            warn!("storage failure while claiming {instrument} in {room}: {e}");
            return;
        }
    };

    map.detach(connection);
    match map.slot_mut(instrument) {
        Reservation::Reserved { holder } => {
            *holder = Some(connection);
            debug!("connection {connection} claimed {instrument} in room {room}");
        }
        Reservation::Free => {
            // Claims never create reservations
            debug!("ignoring claim of free instrument {instrument} in room {room}");
        }
    }

    if let Err(e) = state.store.save_instruments(room, &map).await {
        warn!("failed to persist claim of {instrument} in {room}: {e}");
    }
}

/// Free whatever instrument the dropped connection still holds.
///
/// Runs on every disconnect. If another path already released the slot the
/// holder entry is gone and nothing happens; disconnects racing an explicit
/// release are expected and not worth surfacing.
pub async fn disconnect(state: &AppState, room: &str, connection: Uuid) {
    let Some(_guard) = state.channels.lock(room).await else {
        // Room already deleted, nothing left to release
        return;
    };
    let mut map = match state.store.load_instruments(room).await {
        Ok(Some(map)) => map,
        Ok(None) => return,
        Err(e) => {
            warn!("storage failure while releasing after disconnect in {room}: {e}");
            return;
        }
    };
    let Some(instrument) = map.held_by(connection) else {
        return;
    };

    *map.slot_mut(instrument) = Reservation::Free;
    match state.store.save_instruments(room, &map).await {
        Ok(true) => {
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
            debug!("auto-released {instrument} after {connection} left room {room}");
        }
        Ok(false) => {}
        Err(e) => warn!("failed to auto-release {instrument} in {room}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{reservation_service, room_service};
    use crate::store::{MemoryStore, RoomStore};
    use crate::ws::channels::ChannelRegistry;

    async fn state_with_room(room: &str) -> AppState {
        let state = AppState {
            store: RoomStore::Memory(MemoryStore::new()),
            channels: ChannelRegistry::new(),
        };
        room_service::create_room(&state, room).await.unwrap();
        state
    }

    #[tokio::test]
    async fn claim_attaches_the_connection_as_holder() {
        let state = state_with_room("asdf").await;
        let connection = Uuid::new_v4();
        reservation_service::reserve(&state, "asdf", "drums")
            .await
            .unwrap();

        claim(&state, "asdf", connection, Instrument::Drums).await;

        let map = state.store.load_instruments("asdf").await.unwrap().unwrap();
        assert_eq!(map.held_by(connection), Some(Instrument::Drums));
    }

    #[tokio::test]
    async fn claiming_a_free_instrument_is_ignored() {
        let state = state_with_room("asdf").await;
        let connection = Uuid::new_v4();

        claim(&state, "asdf", connection, Instrument::Drums).await;

        let map = state.store.load_instruments("asdf").await.unwrap().unwrap();
        assert!(!map.slot(Instrument::Drums).is_reserved());
        assert_eq!(map.held_by(connection), None);
    }

    #[tokio::test]
    async fn a_second_claim_detaches_the_first() {
        let state = state_with_room("asdf").await;
        let connection = Uuid::new_v4();
        reservation_service::reserve(&state, "asdf", "drums")
            .await
            .unwrap();
        reservation_service::reserve(&state, "asdf", "bass")
            .await
            .unwrap();

        claim(&state, "asdf", connection, Instrument::Drums).await;
        claim(&state, "asdf", connection, Instrument::Bass).await;

        let map = state.store.load_instruments("asdf").await.unwrap().unwrap();
        assert_eq!(map.held_by(connection), Some(Instrument::Bass));
        // The abandoned slot stays reserved
        assert!(map.slot(Instrument::Drums).is_reserved());
    }

    #[tokio::test]
    async fn disconnect_releases_the_held_instrument() {
        let state = state_with_room("asdf").await;
        let connection = Uuid::new_v4();
        reservation_service::reserve(&state, "asdf", "drums")
            .await
            .unwrap();
        claim(&state, "asdf", connection, Instrument::Drums).await;

        let mut rx = state.channels.subscribe("asdf").await.unwrap();
        disconnect(&state, "asdf", connection).await;

        assert!(matches!(
            rx.recv().await.unwrap(),
            RoomEvent::InstrumentReleased { instrument: Instrument::Drums }
        ));
        match rx.recv().await.unwrap() {
            RoomEvent::InstrumentsChanged { instruments } => assert!(!instruments.drums),
            other => panic!("unexpected event: {other:?}"),
        }

        let map = state.store.load_instruments("asdf").await.unwrap().unwrap();
        assert!(!map.slot(Instrument::Drums).is_reserved());
    }

    #[tokio::test]
    async fn disconnect_after_explicit_release_is_a_silent_noop() {
        let state = state_with_room("asdf").await;
        let connection = Uuid::new_v4();
        reservation_service::reserve(&state, "asdf", "drums")
            .await
            .unwrap();
        claim(&state, "asdf", connection, Instrument::Drums).await;
        reservation_service::release(&state, "asdf", "drums")
            .await
            .unwrap();

        let mut rx = state.channels.subscribe("asdf").await.unwrap();
        disconnect(&state, "asdf", connection).await;

        // No release events were emitted for the disconnect
        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn disconnect_without_a_claim_releases_nothing() {
        let state = state_with_room("asdf").await;
        reservation_service::reserve(&state, "asdf", "drums")
            .await
            .unwrap();

        disconnect(&state, "asdf", Uuid::new_v4()).await;

        // A reservation nobody claimed stays reserved
        let map = state.store.load_instruments("asdf").await.unwrap().unwrap();
        assert!(map.slot(Instrument::Drums).is_reserved());
    }
}
