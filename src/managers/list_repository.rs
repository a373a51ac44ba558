//! Reading List Repository.
//!
//! Owns the canonical reading list. The whole list lives under one store key
//! and every mutator is a read-modify-write of that key: one `get`, then (if
//! anything changed) one `set` of the full list.
//!
//! Mutators on the same repository are serialized by an async write lock.
//! Separate repositories sharing a store (for example a popup and a
//! background context) are not coordinated: the last write wins.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::storage::{entry, KeyValueStore};
use crate::types::errors::ReadingListError;
use crate::types::reading_item::{
    AddOutcome, ImportEntry, ImportSummary, ReadingItem, ReadingList, RemoveOutcome, UpdateOutcome,
};
use crate::types::settings::KEY_READING_LIST;

/// Source of "now" for creation and last-opened timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Trait defining reading list operations.
#[async_trait]
pub trait ReadingListRepositoryTrait: Send + Sync {
    async fn add(
        &self,
        url: &str,
        title: &str,
        original_title: Option<&str>,
    ) -> Result<AddOutcome, ReadingListError>;
    async fn remove(&self, url: &str) -> Result<RemoveOutcome, ReadingListError>;
    async fn update_title(&self, url: &str, title: &str) -> Result<UpdateOutcome, ReadingListError>;
    async fn mark_opened(&self, url: &str) -> Result<UpdateOutcome, ReadingListError>;
    async fn clear(&self) -> Result<(), ReadingListError>;
    async fn import(&self, entries: Vec<ImportEntry>) -> Result<ImportSummary, ReadingListError>;
    /// Snapshot of the stored list. Changing it does not persist anything.
    async fn all(&self) -> Result<ReadingList, ReadingListError>;
}

pub struct ReadingListRepository {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl ReadingListRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<ReadingList, ReadingListError> {
        let mut found = self.store.get(&[KEY_READING_LIST]).await?;
        match found.remove(KEY_READING_LIST) {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| ReadingListError::Corrupt(e.to_string())),
        }
    }

    async fn persist(&self, list: &[ReadingItem]) -> Result<(), ReadingListError> {
        let value = serde_json::to_value(list)
            .map_err(|e| ReadingListError::Corrupt(format!("failed to encode list: {}", e)))?;
        self.store.set(entry(KEY_READING_LIST, value)).await?;
        Ok(())
    }

    /// Applies `edit` to the item with `url`, persisting only when it exists.
    async fn edit_item<F>(&self, url: &str, edit: F) -> Result<UpdateOutcome, ReadingListError>
    where
        F: FnOnce(&mut ReadingItem) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;
        let Some(item) = list.iter_mut().find(|item| item.url == url) else {
            log::debug!("no saved page for {}", url);
            return Ok(UpdateOutcome::NotFound);
        };
        edit(item);
        self.persist(&list).await?;
        Ok(UpdateOutcome::Updated)
    }
}

#[async_trait]
impl ReadingListRepositoryTrait for ReadingListRepository {
    /// Appends a new item unless the url is already saved.
    async fn add(
        &self,
        url: &str,
        title: &str,
        original_title: Option<&str>,
    ) -> Result<AddOutcome, ReadingListError> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;

        if list.iter().any(|item| item.url == url) {
            log::debug!("{} is already saved", url);
            return Ok(AddOutcome::AlreadyExists);
        }

        list.push(ReadingItem::new(url, title, original_title, self.clock.now()));
        self.persist(&list).await?;
        log::info!("saved {} ({} items)", url, list.len());
        Ok(AddOutcome::Added)
    }

    async fn remove(&self, url: &str) -> Result<RemoveOutcome, ReadingListError> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;
        let before = list.len();
        list.retain(|item| item.url != url);

        if list.len() == before {
            log::debug!("nothing to remove for {}", url);
            return Ok(RemoveOutcome::NotFound);
        }

        self.persist(&list).await?;
        Ok(RemoveOutcome::Removed)
    }

    async fn update_title(&self, url: &str, title: &str) -> Result<UpdateOutcome, ReadingListError> {
        let title = title.to_string();
        self.edit_item(url, move |item| item.title = title).await
    }

    async fn mark_opened(&self, url: &str) -> Result<UpdateOutcome, ReadingListError> {
        let now = self.clock.now();
        self.edit_item(url, move |item| item.last_opened = Some(now)).await
    }

    async fn clear(&self) -> Result<(), ReadingListError> {
        let _guard = self.write_lock.lock().await;
        self.persist(&[]).await?;
        log::info!("cleared reading list");
        Ok(())
    }

    /// Merges imported entries, skipping urls that are already saved or repeated.
    async fn import(&self, entries: Vec<ImportEntry>) -> Result<ImportSummary, ReadingListError> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;
        let mut seen: HashSet<String> = list.iter().map(|item| item.url.clone()).collect();
        let mut summary = ImportSummary::default();
        let now = self.clock.now();

        for imported in entries {
            if !seen.insert(imported.url.clone()) {
                summary.skipped += 1;
                continue;
            }
            let title = imported.title.unwrap_or_else(|| imported.url.clone());
            list.push(ReadingItem::new(
                &imported.url,
                &title,
                imported.original_title.as_deref(),
                imported.date.unwrap_or(now),
            ));
            summary.added += 1;
        }

        if summary.added > 0 {
            self.persist(&list).await?;
        }
        log::info!("imported {} pages, skipped {}", summary.added, summary.skipped);
        Ok(summary)
    }

    async fn all(&self) -> Result<ReadingList, ReadingListError> {
        self.load().await
    }
}
