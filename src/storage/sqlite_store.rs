//! Durable key-value store backed by SQLite.
//!
//! Values are stored as JSON text in `kv_entries`; each `set` runs in one
//! transaction so a batch lands completely or not at all.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::params;
use serde_json::Value;

use super::{KeyValueStore, StoreMap};
use crate::database::Database;
use crate::types::errors::StorageError;

pub struct SqliteStore {
    db: Mutex<Database>,
}

impl SqliteStore {
    /// Opens (or creates) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = Database::open(path)?;
        Ok(Self { db: Mutex::new(db) })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let db = Database::open_in_memory()?;
        Ok(Self { db: Mutex::new(db) })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Database>, StorageError> {
        self.db
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("database lock poisoned: {}", e)))
    }

    fn decode(key: &str, raw: &str) -> Result<Value, StorageError> {
        serde_json::from_str(raw).map_err(|e| {
            StorageError::Serialization(format!("value for '{}' is not valid JSON: {}", key, e))
        })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreMap, StorageError> {
        let db = self.lock()?;
        let mut stmt = db
            .connection()
            .prepare_cached("SELECT value FROM kv_entries WHERE key = ?1")?;

        let mut result = StoreMap::new();
        for key in keys {
            let mut rows = stmt.query(params![key])?;
            if let Some(row) = rows.next()? {
                let raw: String = row.get(0)?;
                result.insert(key.to_string(), Self::decode(key, &raw)?);
            }
        }
        Ok(result)
    }

    async fn get_all(&self) -> Result<StoreMap, StorageError> {
        let db = self.lock()?;
        let mut stmt = db
            .connection()
            .prepare("SELECT key, value FROM kv_entries ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut result = StoreMap::new();
        for row in rows {
            let (key, raw) = row?;
            let value = Self::decode(&key, &raw)?;
            result.insert(key, value);
        }
        Ok(result)
    }

    async fn set(&self, data: StoreMap) -> Result<(), StorageError> {
        let mut db = self.lock()?;
        let now = chrono::Utc::now().timestamp();
        let tx = db.connection_mut().transaction()?;
        for (key, value) in &data {
            let raw = serde_json::to_string(value)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            tx.execute(
                "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, raw, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
