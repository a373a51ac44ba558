//! Unit tests for the ReadingListRepository public API.
//!
//! These tests exercise add/remove/update/clear/import through
//! `ReadingListRepositoryTrait`, using in-memory stores. A few wrapper stores
//! count or delay store calls so the read-modify-write shape of each
//! mutator can be observed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use readlater::managers::list_repository::{
    Clock, ReadingListRepository, ReadingListRepositoryTrait,
};
use readlater::storage::{entry, KeyValueStore, MemoryStore, StoreMap};
use readlater::types::errors::{ReadingListError, StorageError};
use readlater::types::reading_item::{AddOutcome, ImportEntry, RemoveOutcome, UpdateOutcome};

/// Clock that only moves when told to.
struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn new() -> Self {
        Self(Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()))
    }

    fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Counts `get` and `set` calls made against an inner store.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingStore {
    fn counts(&self) -> (usize, usize) {
        (self.reads.load(Ordering::SeqCst), self.writes.load(Ordering::SeqCst))
    }

    fn reset(&self) {
        self.reads.store(0, Ordering::SeqCst);
        self.writes.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreMap, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(keys).await
    }

    async fn get_all(&self) -> Result<StoreMap, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_all().await
    }

    async fn set(&self, data: StoreMap) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(data).await
    }
}

/// Takes its snapshot, then yields before returning it, so concurrent
/// callers interleave between their read and their write.
#[derive(Default)]
struct YieldingStore {
    inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for YieldingStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreMap, StorageError> {
        let snapshot = self.inner.get(keys).await;
        tokio::task::yield_now().await;
        snapshot
    }

    async fn get_all(&self) -> Result<StoreMap, StorageError> {
        self.inner.get_all().await
    }

    async fn set(&self, data: StoreMap) -> Result<(), StorageError> {
        self.inner.set(data).await
    }
}

/// Store whose every call fails.
struct UnavailableStore;

#[async_trait]
impl KeyValueStore for UnavailableStore {
    async fn get(&self, _keys: &[&str]) -> Result<StoreMap, StorageError> {
        Err(StorageError::Unavailable("offline".to_string()))
    }

    async fn get_all(&self) -> Result<StoreMap, StorageError> {
        Err(StorageError::Unavailable("offline".to_string()))
    }

    async fn set(&self, _data: StoreMap) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("offline".to_string()))
    }
}

fn setup() -> ReadingListRepository {
    ReadingListRepository::new(Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_add_appends_item_with_creation_date() {
    let clock = Arc::new(ManualClock::new());
    let repo = ReadingListRepository::with_clock(Arc::new(MemoryStore::new()), clock.clone());

    let outcome = repo.add("https://a.com", "A", Some("A original")).await.unwrap();
    assert_eq!(outcome, AddOutcome::Added);

    let list = repo.all().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].url, "https://a.com");
    assert_eq!(list[0].title, "A");
    assert_eq!(list[0].original_title.as_deref(), Some("A original"));
    assert_eq!(list[0].date, clock.now());
    assert!(list[0].last_opened.is_none());
}

#[tokio::test]
async fn test_add_same_url_twice_keeps_one_item() {
    let repo = setup();

    assert_eq!(repo.add("https://a.com", "A", None).await.unwrap(), AddOutcome::Added);
    assert_eq!(
        repo.add("https://a.com", "Another title", None).await.unwrap(),
        AddOutcome::AlreadyExists
    );

    let list = repo.all().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].title, "A", "the duplicate save must not touch the stored item");
}

#[tokio::test]
async fn test_add_add_remove_leaves_second_item() {
    let repo = setup();
    repo.add("https://a.com", "A", None).await.unwrap();
    repo.add("https://b.com", "B", None).await.unwrap();

    assert_eq!(repo.remove("https://a.com").await.unwrap(), RemoveOutcome::Removed);

    let list = repo.all().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].url, "https://b.com");
    assert_eq!(list[0].title, "B");
}

#[tokio::test]
async fn test_items_keep_insertion_order() {
    let repo = setup();
    for url in ["https://1.com", "https://2.com", "https://3.com"] {
        repo.add(url, url, None).await.unwrap();
    }
    let urls: Vec<String> = repo.all().await.unwrap().into_iter().map(|i| i.url).collect();
    assert_eq!(urls, vec!["https://1.com", "https://2.com", "https://3.com"]);
}

#[tokio::test]
async fn test_remove_unknown_url_reports_not_found() {
    let repo = setup();
    repo.add("https://a.com", "A", None).await.unwrap();
    assert_eq!(repo.remove("https://zzz.com").await.unwrap(), RemoveOutcome::NotFound);
    assert_eq!(repo.all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_title_in_place() {
    let repo = setup();
    repo.add("https://a.com", "A", None).await.unwrap();
    repo.add("https://b.com", "B", None).await.unwrap();

    assert_eq!(
        repo.update_title("https://a.com", "Renamed").await.unwrap(),
        UpdateOutcome::Updated
    );

    let list = repo.all().await.unwrap();
    assert_eq!(list[0].title, "Renamed");
    assert_eq!(list[0].url, "https://a.com", "position must not change");
    assert_eq!(
        repo.update_title("https://nope.com", "x").await.unwrap(),
        UpdateOutcome::NotFound
    );
}

#[tokio::test]
async fn test_mark_opened_sets_timestamp() {
    let clock = Arc::new(ManualClock::new());
    let repo = ReadingListRepository::with_clock(Arc::new(MemoryStore::new()), clock.clone());
    repo.add("https://a.com", "A", None).await.unwrap();

    clock.advance(Duration::hours(3));
    assert_eq!(repo.mark_opened("https://a.com").await.unwrap(), UpdateOutcome::Updated);

    let item = &repo.all().await.unwrap()[0];
    assert_eq!(item.last_opened, Some(clock.now()));
    assert!(item.date < clock.now());
}

#[tokio::test]
async fn test_clear_empties_list() {
    let repo = setup();
    repo.add("https://a.com", "A", None).await.unwrap();
    repo.add("https://b.com", "B", None).await.unwrap();

    repo.clear().await.unwrap();
    assert!(repo.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_import_skips_existing_and_repeated_urls() {
    let repo = setup();
    repo.add("https://a.com", "A", None).await.unwrap();

    let summary = repo
        .import(vec![
            ImportEntry::from_url("https://a.com"),
            ImportEntry::from_url("https://b.com"),
            ImportEntry::from_url("https://b.com"),
            ImportEntry {
                url: "https://c.com".to_string(),
                title: Some("C".to_string()),
                original_title: None,
                date: None,
            },
        ])
        .await
        .unwrap();

    assert_eq!(summary.added, 2);
    assert_eq!(summary.skipped, 2);

    let list = repo.all().await.unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[1].title, "https://b.com", "untitled imports use the url as title");
    assert_eq!(list[2].title, "C");
}

#[tokio::test]
async fn test_mutators_read_once_and_write_once() {
    let store = Arc::new(CountingStore::default());
    let repo = ReadingListRepository::new(store.clone());

    repo.add("https://a.com", "A", None).await.unwrap();
    assert_eq!(store.counts(), (1, 1));

    store.reset();
    repo.update_title("https://a.com", "B").await.unwrap();
    assert_eq!(store.counts(), (1, 1));

    store.reset();
    repo.mark_opened("https://a.com").await.unwrap();
    assert_eq!(store.counts(), (1, 1));

    store.reset();
    repo.remove("https://a.com").await.unwrap();
    assert_eq!(store.counts(), (1, 1));
}

#[tokio::test]
async fn test_no_op_mutations_skip_the_write() {
    let store = Arc::new(CountingStore::default());
    let repo = ReadingListRepository::new(store.clone());
    repo.add("https://a.com", "A", None).await.unwrap();

    store.reset();
    repo.add("https://a.com", "A", None).await.unwrap();
    repo.remove("https://missing.com").await.unwrap();
    repo.update_title("https://missing.com", "x").await.unwrap();
    assert_eq!(store.counts(), (3, 0));
}

#[tokio::test]
async fn test_concurrent_adds_on_one_repository_are_serialized() {
    let repo = ReadingListRepository::new(Arc::new(YieldingStore::default()));

    let (a, b) = tokio::join!(
        repo.add("https://a.com", "A", None),
        repo.add("https://b.com", "B", None)
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(repo.all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_separate_repositories_race_and_last_write_wins() {
    let store: Arc<dyn KeyValueStore> = Arc::new(YieldingStore::default());
    let popup = ReadingListRepository::new(store.clone());
    let background = ReadingListRepository::new(store.clone());

    let (a, b) = tokio::join!(
        popup.add("https://a.com", "A", None),
        background.add("https://b.com", "B", None)
    );
    a.unwrap();
    b.unwrap();

    let list = popup.all().await.unwrap();
    assert_eq!(list.len(), 1, "both read an empty list, so one update is lost");
    assert_eq!(list[0].url, "https://b.com");
}

#[tokio::test]
async fn test_unavailable_store_surfaces_storage_error() {
    let repo = ReadingListRepository::new(Arc::new(UnavailableStore));
    let err = repo.add("https://a.com", "A", None).await.unwrap_err();
    assert!(matches!(err, ReadingListError::Storage(StorageError::Unavailable(_))));
    assert!(repo.all().await.is_err());
}

#[tokio::test]
async fn test_corrupt_list_is_reported() {
    let store = Arc::new(MemoryStore::new());
    store.set(entry("readingList", json!({"not": "a list"}))).await.unwrap();
    let repo = ReadingListRepository::new(store);

    let err = repo.all().await.unwrap_err();
    assert!(matches!(err, ReadingListError::Corrupt(_)));
}

#[tokio::test]
async fn test_reads_list_written_by_earlier_builds() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(entry(
            "readingList",
            json!([
                {"url": "https://old.com", "title": "Old", "date": "2023-03-04T05:06:07.890Z"},
                {"url": "https://new.com", "title": "New", "originalTitle": "New!",
                 "date": "2024-03-04T05:06:07.890Z", "lastOpened": "2024-03-05T00:00:00.000Z"}
            ]),
        ))
        .await
        .unwrap();
    let repo = ReadingListRepository::new(store);

    let list = repo.all().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1].original_title.as_deref(), Some("New!"));
    assert!(list[1].last_opened.is_some());
}
