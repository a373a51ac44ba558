//! Unit tests for the BadgePresenter: memoized writes, debounce, the save
//! confirmation window and theme switching.
//!
//! Timing tests run on a paused tokio clock, so sleeps advance virtual time.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use readlater::services::badge_presenter::{BadgePresenter, BadgeSurface};
use readlater::storage::{entry, KeyValueStore, MemoryStore};
use readlater::types::badge::{BadgePhase, IconSet};
use readlater::types::errors::SurfaceError;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Text(String),
    Color(String),
    Icon(&'static str),
}

/// Records every write the presenter makes.
#[derive(Default)]
struct RecordingSurface {
    calls: Mutex<Vec<Call>>,
}

impl RecordingSurface {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn last_text(&self) -> Option<String> {
        self.texts().pop()
    }
}

#[async_trait]
impl BadgeSurface for RecordingSurface {
    async fn set_badge_text(&self, text: &str) -> Result<(), SurfaceError> {
        self.calls.lock().unwrap().push(Call::Text(text.to_string()));
        Ok(())
    }

    async fn set_badge_color(&self, color: &str) -> Result<(), SurfaceError> {
        self.calls.lock().unwrap().push(Call::Color(color.to_string()));
        Ok(())
    }

    async fn set_icon(&self, icons: &IconSet) -> Result<(), SurfaceError> {
        self.calls.lock().unwrap().push(Call::Icon(icons.size_48));
        Ok(())
    }
}

fn list_of(n: usize) -> serde_json::Value {
    let items: Vec<_> = (0..n)
        .map(|i| json!({"url": format!("https://{}.com", i), "title": "t", "date": "2024-01-01T00:00:00.000Z"}))
        .collect();
    json!(items)
}

async fn setup(count: usize) -> (Arc<MemoryStore>, Arc<RecordingSurface>, BadgePresenter) {
    let store = Arc::new(MemoryStore::new());
    store.set(entry("readingList", list_of(count))).await.unwrap();
    let surface = Arc::new(RecordingSurface::default());
    let presenter = BadgePresenter::new(store.clone(), surface.clone());
    (store, surface, presenter)
}

#[tokio::test(start_paused = true)]
async fn test_refresh_applies_count_after_debounce() {
    let (_store, surface, presenter) = setup(3).await;

    presenter.refresh().await;
    assert!(surface.calls().is_empty(), "nothing is written inside the debounce window");

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(surface.last_text().as_deref(), Some("3"));
    assert_eq!(presenter.phase(), BadgePhase::Steady);
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_refreshes_collapses_to_latest() {
    let (store, surface, presenter) = setup(1).await;

    presenter.refresh().await;
    store.set(entry("readingList", list_of(2))).await.unwrap();
    presenter.refresh().await;
    store.set(entry("readingList", list_of(5))).await.unwrap();
    presenter.refresh().await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(surface.texts(), vec!["5".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_identical_badge_is_not_rewritten() {
    let (_store, surface, presenter) = setup(2).await;

    presenter.refresh().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    let writes = surface.calls().len();

    presenter.refresh().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(surface.calls().len(), writes);
}

#[tokio::test(start_paused = true)]
async fn test_badge_hidden_when_show_badge_is_false() {
    let (store, surface, presenter) = setup(4).await;
    store.set(entry("showBadge", json!(false))).await.unwrap();

    presenter.refresh().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(surface.last_text().as_deref(), Some(""));
}

#[tokio::test(start_paused = true)]
async fn test_confirmation_shows_check_then_reverts_after_window() {
    let (_store, surface, presenter) = setup(1).await;

    presenter.confirm_save().await;
    assert_eq!(surface.last_text().as_deref(), Some("✓"));
    assert_eq!(presenter.phase(), BadgePhase::Confirming);

    tokio::time::sleep(Duration::from_millis(1999)).await;
    assert_eq!(surface.last_text().as_deref(), Some("✓"), "must not revert early");

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(surface.last_text().as_deref(), Some("1"));
    assert_eq!(presenter.phase(), BadgePhase::Steady);
}

#[tokio::test(start_paused = true)]
async fn test_confirmation_reverts_to_current_count() {
    let (store, surface, presenter) = setup(1).await;

    presenter.confirm_save().await;
    store.set(entry("readingList", list_of(7))).await.unwrap();
    presenter.refresh().await;

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(surface.last_text().as_deref(), Some("✓"), "refresh waits for the confirmation");

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(surface.last_text().as_deref(), Some("7"));
}

#[tokio::test(start_paused = true)]
async fn test_second_save_restarts_the_window() {
    let (_store, surface, presenter) = setup(2).await;

    presenter.confirm_save().await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    presenter.confirm_save().await;

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(surface.last_text().as_deref(), Some("✓"));

    tokio::time::sleep(Duration::from_millis(1001)).await;
    assert_eq!(surface.last_text().as_deref(), Some("2"));
    assert_eq!(
        surface.texts().iter().filter(|t| t.as_str() == "2").count(),
        1,
        "the first timer must not fire after being replaced"
    );
}

#[tokio::test(start_paused = true)]
async fn test_confirmation_with_empty_list_reverts_to_blank() {
    let (store, surface, presenter) = setup(0).await;
    store.set(entry("readingList", list_of(1))).await.unwrap();

    presenter.confirm_save().await;
    store.set(entry("readingList", list_of(0))).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2001)).await;

    assert_eq!(surface.last_text().as_deref(), Some(""));
}

#[tokio::test]
async fn test_apply_theme_is_idempotent() {
    let (_store, surface, presenter) = setup(0).await;

    presenter.apply_theme(true).await;
    presenter.apply_theme(true).await;

    assert_eq!(
        surface.calls(),
        vec![
            Call::Icon("icons/icon-48-dark.png"),
            Call::Color("#9aa0a6".to_string())
        ]
    );

    presenter.apply_theme(false).await;
    let calls = surface.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[2], Call::Icon("icons/icon-48.png"));
    assert_eq!(calls[3], Call::Color("#666666".to_string()));
}

#[tokio::test]
async fn test_apply_writes_only_changed_parts() {
    let (_store, surface, presenter) = setup(0).await;
    let badge = presenter.steady_badge().await.unwrap();
    presenter.apply(&badge).await;
    presenter.apply(&badge).await;

    assert_eq!(surface.calls().len(), 2, "one text write and one color write");
    assert_eq!(presenter.last_applied(), Some(badge));
}

/// Surface that rejects every write.
struct BrokenSurface;

#[async_trait]
impl BadgeSurface for BrokenSurface {
    async fn set_badge_text(&self, _text: &str) -> Result<(), SurfaceError> {
        Err(SurfaceError("toolbar gone".to_string()))
    }

    async fn set_badge_color(&self, _color: &str) -> Result<(), SurfaceError> {
        Err(SurfaceError("toolbar gone".to_string()))
    }

    async fn set_icon(&self, _icons: &IconSet) -> Result<(), SurfaceError> {
        Err(SurfaceError("toolbar gone".to_string()))
    }
}

#[tokio::test]
async fn test_failed_writes_are_not_memoized() {
    let store = Arc::new(MemoryStore::new());
    let presenter = BadgePresenter::new(store, Arc::new(BrokenSurface));

    let badge = presenter.steady_badge().await.unwrap();
    presenter.apply(&badge).await;
    presenter.apply_theme(true).await;

    assert_eq!(presenter.last_applied(), None);
}

/// Surface whose steady-state text writes wait for `release` while `hold` is set.
#[derive(Default)]
struct StallingSurface {
    texts: Mutex<Vec<String>>,
    hold: std::sync::atomic::AtomicBool,
    release: tokio::sync::Notify,
}

#[async_trait]
impl BadgeSurface for StallingSurface {
    async fn set_badge_text(&self, text: &str) -> Result<(), SurfaceError> {
        if text != "✓" && self.hold.load(std::sync::atomic::Ordering::SeqCst) {
            self.release.notified().await;
        }
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn set_badge_color(&self, _color: &str) -> Result<(), SurfaceError> {
        Ok(())
    }

    async fn set_icon(&self, _icons: &IconSet) -> Result<(), SurfaceError> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_save_during_slow_expiry_write_keeps_check() {
    let store = Arc::new(MemoryStore::new());
    store.set(entry("readingList", list_of(1))).await.unwrap();
    let surface = Arc::new(StallingSurface::default());
    let presenter = BadgePresenter::new(store, surface.clone());

    presenter.confirm_save().await;
    surface.hold.store(true, std::sync::atomic::Ordering::SeqCst);

    // The window expires and its write of "1" stalls on the surface.
    tokio::time::sleep(Duration::from_millis(2001)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    let second = {
        let presenter = presenter.clone();
        tokio::spawn(async move { presenter.confirm_save().await })
    };
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    surface.release.notify_one();
    second.await.unwrap();

    assert_eq!(
        surface.texts.lock().unwrap().last().map(String::as_str),
        Some("✓")
    );
    assert_eq!(presenter.phase(), BadgePhase::Confirming);
}
