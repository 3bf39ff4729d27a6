pub mod db;
pub mod memory;

pub use db::DbStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::models::InstrumentMap;

/// Failure talking to the backing store. Logged and surfaced as an
/// unstructured server error; never retried or buffered.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage access for the global room index and the per-room instrument
/// maps. No business logic lives here: validation happens in the services,
/// the store only reads and overwrites whole maps.
pub enum RoomStore {
    Memory(MemoryStore),
    Db(DbStore),
}

impl RoomStore {
    /// Room names in creation order.
    pub async fn list_rooms(&self) -> Result<Vec<String>, StoreError> {
        match self {
            RoomStore::Memory(store) => Ok(store.list_rooms().await),
            RoomStore::Db(store) => store.list_rooms().await,
        }
    }

    /// Append the room to the index and persist its initial map as one
    /// logical unit. Returns false if the name is already taken.
    pub async fn insert_room(&self, name: &str, map: &InstrumentMap) -> Result<bool, StoreError> {
        match self {
            RoomStore::Memory(store) => Ok(store.insert_room(name, map).await),
            RoomStore::Db(store) => store.insert_room(name, map).await,
        }
    }

    /// Remove the room from the index and delete its map as one logical
    /// unit. Returns false if no such room existed.
    pub async fn delete_room(&self, name: &str) -> Result<bool, StoreError> {
        match self {
            RoomStore::Memory(store) => Ok(store.delete_room(name).await),
            RoomStore::Db(store) => store.delete_room(name).await,
        }
    }

    pub async fn load_instruments(&self, name: &str) -> Result<Option<InstrumentMap>, StoreError> {
        match self {
            RoomStore::Memory(store) => Ok(store.load_instruments(name).await),
            RoomStore::Db(store) => store.load_instruments(name).await,
        }
    }

    /// Overwrite the room's map wholesale. Returns false if the room vanished
    /// in the meantime.
    pub async fn save_instruments(
        &self,
        name: &str,
        map: &InstrumentMap,
    ) -> Result<bool, StoreError> {
        match self {
            RoomStore::Memory(store) => Ok(store.save_instruments(name, map).await),
            RoomStore::Db(store) => store.save_instruments(name, map).await,
        }
    }

    /// Drop every room and every map.
    pub async fn flush(&self) -> Result<(), StoreError> {
        match self {
            RoomStore::Memory(store) => {
                store.flush().await;
                Ok(())
            }
            RoomStore::Db(store) => store.flush().await,
        }
    }
}
