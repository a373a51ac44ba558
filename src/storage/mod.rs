//! Key-value store seam.
//!
//! Everything the crate persists goes through [`KeyValueStore`]: an async
//! `get`/`set` over a string-keyed map of JSON values. Two implementations
//! ship with the crate: [`MemoryStore`] for tests and ephemeral contexts, and
//! [`SqliteStore`] for durable storage on disk.

pub mod memory_store;
pub mod sqlite_store;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::types::errors::StorageError;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

/// A batch of key/value pairs read from or written to the store.
pub type StoreMap = Map<String, Value>;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the values for `keys` that exist. Missing keys are absent from the map.
    async fn get(&self, keys: &[&str]) -> Result<StoreMap, StorageError>;
    /// Returns every stored key.
    async fn get_all(&self) -> Result<StoreMap, StorageError>;
    /// Writes every pair in `data`, replacing existing values. Other keys are untouched.
    async fn set(&self, data: StoreMap) -> Result<(), StorageError>;
}

/// Builds a single-entry `StoreMap`.
pub fn entry(key: &str, value: Value) -> StoreMap {
    let mut map = StoreMap::new();
    map.insert(key.to_string(), value);
    map
}
