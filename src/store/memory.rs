use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::models::InstrumentMap;

/// In-process store. Used by the test suites and whenever no database URL is
/// configured; rooms do not survive a restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    index: Vec<String>,
    maps: HashMap<String, InstrumentMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list_rooms(&self) -> Vec<String> {
        self.inner.read().await.index.clone()
    }

    pub async fn insert_room(&self, name: &str, map: &InstrumentMap) -> bool {
        let mut inner = self.inner.write().await;
        if inner.maps.contains_key(name) {
            return false;
        }
        inner.index.push(name.to_string());
        inner.maps.insert(name.to_string(), *map);
        true
    }

    pub async fn delete_room(&self, name: &str) -> bool {
        let mut inner = self.inner.write().await;
        if inner.maps.remove(name).is_none() {
            return false;
        }
        inner.index.retain(|room| room != name);
        true
    }

    pub async fn load_instruments(&self, name: &str) -> Option<InstrumentMap> {
        self.inner.read().await.maps.get(name).copied()
    }

    pub async fn save_instruments(&self, name: &str, map: &InstrumentMap) -> bool {
        let mut inner = self.inner.write().await;
        match inner.maps.get_mut(name) {
            Some(slot) => {
                *slot = *map;
                true
            }
            None => false,
        }
    }

    pub async fn flush(&self) {
        let mut inner = self.inner.write().await;
        inner.index.clear();
        inner.maps.clear();
    }
}
