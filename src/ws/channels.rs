use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

use crate::models::RoomEvent;

/// Events buffered per subscriber before a slow client starts lagging.
const CHANNEL_CAPACITY: usize = 100;

/// Fan-out channel plus the write guard for one room.
struct RoomChannel {
    events: broadcast::Sender<RoomEvent>,
    /// Serializes every read-modify-write over the room's instrument map
    /// (reserve, release, claim, disconnect-release), so two concurrent
    /// reservations of the same instrument cannot both observe it free.
    write_lock: Arc<Mutex<()>>,
}

/// One broadcast channel per existing room, opened and closed in lock-step
/// with the room itself. The channel stores nothing beyond its membership:
/// closing it simply ends every subscriber's event stream.
#[derive(Default)]
pub struct ChannelRegistry {
    channels: RwLock<HashMap<String, RoomChannel>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the room's channel. Opening an already open channel is a no-op,
    /// so existing members are never cut off.
    pub async fn open(&self, room: &str) {
        let mut channels = self.channels.write().await;
        channels.entry(room.to_string()).or_insert_with(|| {
            let (events, _rx) = broadcast::channel(CHANNEL_CAPACITY);
            RoomChannel {
                events,
                write_lock: Arc::new(Mutex::new(())),
            }
        });
    }

    /// Tear the room's channel down. Dropping the sender closes every
    /// member's receiver; there is no re-routing.
    pub async fn close(&self, room: &str) -> bool {
        self.channels.write().await.remove(room).is_some()
    }

    pub async fn close_all(&self) {
        self.channels.write().await.clear();
    }

    /// Join the room's channel. None if the room has no channel, i.e. the
    /// room does not exist.
    pub async fn subscribe(&self, room: &str) -> Option<broadcast::Receiver<RoomEvent>> {
        self.channels
            .read()
            .await
            .get(room)
            .map(|channel| channel.events.subscribe())
    }

    /// Take the room's critical-section guard. None if the room's channel no
    /// longer exists.
    pub async fn lock(&self, room: &str) -> Option<OwnedMutexGuard<()>> {
        let lock = {
            let channels = self.channels.read().await;
            channels.get(room).map(|channel| channel.write_lock.clone())
        }?;
        Some(lock.lock_owned().await)
    }

    /// Fan an event out to every member of the room. Lossy: a room with no
    /// members just drops the event.
    pub async fn emit(&self, room: &str, event: RoomEvent) {
        if let Some(channel) = self.channels.read().await.get(room) {
            if channel.events.send(event).is_err() {
                debug!("no members in room {room}, dropping event");
            }
        }
    }

    pub async fn member_count(&self, room: &str) -> usize {
        self.channels
            .read()
            .await
            .get(room)
            .map_or(0, |channel| channel.events.receiver_count())
    }

    pub async fn room_count(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Members across all rooms.
    pub async fn connection_count(&self) -> usize {
        self.channels
            .read()
            .await
            .values()
            .map(|channel| channel.events.receiver_count())
            .sum()
    }
}
