use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, StoreMap};
use crate::types::errors::StorageError;

/// Store kept entirely in memory. Contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<StoreMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `data`.
    pub fn with_data(data: StoreMap) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreMap, StorageError> {
        let data = self.data.read().await;
        Ok(keys
            .iter()
            .filter_map(|k| data.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn get_all(&self) -> Result<StoreMap, StorageError> {
        Ok(self.data.read().await.clone())
    }

    async fn set(&self, data: StoreMap) -> Result<(), StorageError> {
        let mut current = self.data.write().await;
        for (k, v) in data {
            current.insert(k, v);
        }
        Ok(())
    }
}
