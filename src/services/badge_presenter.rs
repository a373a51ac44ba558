//! Badge/Icon Presenter: keeps the toolbar badge and icon in step with the
//! stored list and settings.
//!
//! The presenter is the only writer to the toolbar within a context. It
//! remembers what it last applied and skips writes that would not change
//! anything, coalesces bursts of steady-state updates behind a short debounce,
//! and runs the save confirmation (a "✓" for a fixed window) as a small timed
//! state machine: `Idle`/`Steady` → `Confirming` on save, back to `Steady`
//! when the timer expires. A save during `Confirming` restarts the timer.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::services::theme_engine::{badge_color, toolbar_icons};
use crate::storage::KeyValueStore;
use crate::types::badge::{Badge, BadgePhase, IconSet, CONFIRMATION_GLYPH};
use crate::types::errors::{StorageError, SurfaceError};
use crate::types::reading_item::ReadingItem;
use crate::types::settings::{Settings, KEY_IS_DARK_MODE, KEY_READING_LIST, KEY_SHOW_BADGE};

/// The toolbar the presenter draws on.
#[async_trait]
pub trait BadgeSurface: Send + Sync {
    async fn set_badge_text(&self, text: &str) -> Result<(), SurfaceError>;
    async fn set_badge_color(&self, color: &str) -> Result<(), SurfaceError>;
    async fn set_icon(&self, icons: &IconSet) -> Result<(), SurfaceError>;
}

/// Delays used by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenterTimings {
    /// Window in which steady-state updates collapse to the latest one.
    pub debounce: Duration,
    /// How long the confirmation glyph stays up after a save.
    pub confirmation: Duration,
}

impl Default for PresenterTimings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(16),
            confirmation: Duration::from_millis(2000),
        }
    }
}

/// Steady-state badge for a list: the count when enabled and non-zero.
pub fn compute_badge(list: &[ReadingItem], settings: &Settings) -> Badge {
    badge_for_count(list.len(), settings)
}

fn badge_for_count(count: usize, settings: &Settings) -> Badge {
    let text = if settings.show_badge && count > 0 {
        count.to_string()
    } else {
        String::new()
    };
    Badge::new(text, badge_color(settings.is_dark_mode))
}

struct PresenterState {
    phase: BadgePhase,
    last_text: Option<String>,
    last_color: Option<String>,
    icon_theme: Option<bool>,
    pending: Option<JoinHandle<()>>,
    confirm: Option<JoinHandle<()>>,
    confirm_generation: u64,
}

struct Inner {
    store: Arc<dyn KeyValueStore>,
    surface: Arc<dyn BadgeSurface>,
    timings: PresenterTimings,
    state: Mutex<PresenterState>,
    /// Held by whoever is changing the phase and writing the matching badge.
    transition: tokio::sync::Mutex<()>,
}

/// Cheap to clone; clones share the same last-applied state and timers.
#[derive(Clone)]
pub struct BadgePresenter {
    inner: Arc<Inner>,
}

impl BadgePresenter {
    pub fn new(store: Arc<dyn KeyValueStore>, surface: Arc<dyn BadgeSurface>) -> Self {
        Self::with_timings(store, surface, PresenterTimings::default())
    }

    pub fn with_timings(
        store: Arc<dyn KeyValueStore>,
        surface: Arc<dyn BadgeSurface>,
        timings: PresenterTimings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                surface,
                timings,
                state: Mutex::new(PresenterState {
                    phase: BadgePhase::Idle,
                    last_text: None,
                    last_color: None,
                    icon_theme: None,
                    pending: None,
                    confirm: None,
                    confirm_generation: 0,
                }),
                transition: tokio::sync::Mutex::new(()),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, PresenterState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn phase(&self) -> BadgePhase {
        self.state().phase
    }

    /// The badge as last written to the surface, if anything was written.
    pub fn last_applied(&self) -> Option<Badge> {
        let state = self.state();
        match (&state.last_text, &state.last_color) {
            (Some(text), Some(color)) => Some(Badge::new(text.clone(), color.clone())),
            _ => None,
        }
    }

    /// Reads the list and settings from the store and derives the steady badge.
    pub async fn steady_badge(&self) -> Result<Badge, StorageError> {
        let found = self
            .inner
            .store
            .get(&[KEY_READING_LIST, KEY_SHOW_BADGE, KEY_IS_DARK_MODE])
            .await?;

        let count = found
            .get(KEY_READING_LIST)
            .and_then(|v| v.as_array())
            .map(|items| items.len())
            .unwrap_or(0);
        let settings = Settings {
            show_badge: found.get(KEY_SHOW_BADGE).and_then(|v| v.as_bool()).unwrap_or(true),
            is_dark_mode: found.get(KEY_IS_DARK_MODE).and_then(|v| v.as_bool()).unwrap_or(false),
            ..Settings::default()
        };
        Ok(badge_for_count(count, &settings))
    }

    /// Writes `badge` now, skipping the parts that already match the surface.
    pub async fn apply(&self, badge: &Badge) {
        let (text_changed, color_changed) = {
            let state = self.state();
            (
                state.last_text.as_deref() != Some(badge.text.as_str()),
                state.last_color.as_deref() != Some(badge.color.as_str()),
            )
        };

        if text_changed {
            match self.inner.surface.set_badge_text(&badge.text).await {
                Ok(()) => self.state().last_text = Some(badge.text.clone()),
                Err(e) => log::warn!("badge text not updated: {}", e),
            }
        }
        if color_changed {
            match self.inner.surface.set_badge_color(&badge.color).await {
                Ok(()) => self.state().last_color = Some(badge.color.clone()),
                Err(e) => log::warn!("badge color not updated: {}", e),
            }
        }
    }

    /// Applies `badge` after the debounce window unless a newer call replaces it.
    pub fn schedule(&self, badge: Badge) {
        let mut state = self.state();
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.phase = BadgePhase::Steady;

        let this = self.clone();
        let delay = self.inner.timings.debounce;
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _transition = this.inner.transition.lock().await;
            if this.phase() == BadgePhase::Confirming {
                return;
            }
            this.apply(&badge).await;
        }));
    }

    /// Recomputes the steady badge from the store and schedules it.
    ///
    /// While a save confirmation is showing this does nothing; the
    /// confirmation recomputes the badge itself when it ends.
    pub async fn refresh(&self) {
        if self.phase() == BadgePhase::Confirming {
            log::debug!("badge refresh deferred until confirmation ends");
            return;
        }
        match self.steady_badge().await {
            Ok(badge) => self.schedule(badge),
            Err(e) => log::error!("badge refresh failed: {}", e),
        }
    }

    /// Shows the confirmation glyph now and restores the steady badge after
    /// the confirmation window.
    pub async fn confirm_save(&self) {
        let color = match self.steady_badge().await {
            Ok(badge) => badge.color,
            Err(e) => {
                log::error!("save confirmation skipped: {}", e);
                return;
            }
        };

        let _transition = self.inner.transition.lock().await;
        let generation = {
            let mut state = self.state();
            if let Some(pending) = state.pending.take() {
                pending.abort();
            }
            if let Some(previous) = state.confirm.take() {
                previous.abort();
            }
            state.phase = BadgePhase::Confirming;
            state.confirm_generation += 1;
            state.confirm_generation
        };

        self.apply(&Badge::new(CONFIRMATION_GLYPH, color)).await;

        let this = self.clone();
        let window = self.inner.timings.confirmation;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            this.finish_confirmation(generation).await;
        });

        let mut state = self.state();
        if state.confirm_generation == generation {
            state.confirm = Some(handle);
        } else {
            handle.abort();
        }
    }

    async fn finish_confirmation(&self, generation: u64) {
        let _transition = self.inner.transition.lock().await;
        let steady = self.steady_badge().await;
        {
            let mut state = self.state();
            if state.confirm_generation != generation {
                return;
            }
            state.phase = BadgePhase::Steady;
            state.confirm = None;
        }
        match steady {
            Ok(badge) => self.apply(&badge).await,
            Err(e) => log::error!("badge not restored after confirmation: {}", e),
        }
    }

    /// Switches the toolbar icon and badge color to the given scheme.
    ///
    /// Does nothing when the scheme was already applied.
    pub async fn apply_theme(&self, is_dark: bool) {
        {
            let mut state = self.state();
            if state.icon_theme == Some(is_dark) {
                return;
            }
            state.icon_theme = Some(is_dark);
        }

        if let Err(e) = self.inner.surface.set_icon(&toolbar_icons(is_dark)).await {
            log::warn!("toolbar icon not updated: {}", e);
            self.state().icon_theme = None;
            return;
        }

        let color = badge_color(is_dark);
        let color_changed = self.state().last_color.as_deref() != Some(color);
        if color_changed {
            match self.inner.surface.set_badge_color(color).await {
                Ok(()) => self.state().last_color = Some(color.to_string()),
                Err(e) => log::warn!("badge color not updated: {}", e),
            }
        }
        log::debug!("applied {} theme", if is_dark { "dark" } else { "light" });
    }
}
