use crate::store::RoomStore;
use crate::ws::channels::ChannelRegistry;

/// Shared state accessible by all handlers and channel tasks.
pub struct AppState {
    /// Room index and instrument maps
    pub store: RoomStore,
    /// One broadcast channel per existing room
    pub channels: ChannelRegistry,
}
