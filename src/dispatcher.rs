//! Command Dispatcher: the single entry point for popup, keyboard and
//! background events.
//!
//! Each [`Command`] is handled by one arm of [`CommandDispatcher::handle`].
//! [`CommandDispatcher::dispatch`] wraps it so that no failure escapes: the
//! error is logged, [`DispatchOutcome::Failed`] is returned, and the view
//! state is left as it was.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::managers::list_repository::ReadingListRepositoryTrait;
use crate::managers::title_prompt::TitlePrompt;
use crate::services::badge_presenter::BadgePresenter;
use crate::services::list_exchange::{parse_import, write_export};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::theme_engine::{ThemeEngine, ThemeEngineTrait};
use crate::services::view_projector::project;
use crate::types::command::{ActiveTab, Command, DispatchOutcome, ListView};
use crate::types::errors::DispatchError;
use crate::types::reading_item::{AddOutcome, RemoveOutcome, UpdateOutcome};
use crate::types::settings::{Settings, KEY_IS_DARK_MODE, KEY_NEWEST_FIRST, KEY_SHOW_BADGE};

/// Popup state that is not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub search_open: bool,
    pub search_term: String,
    pub edit_mode: bool,
}

pub struct CommandDispatcher {
    repository: Arc<dyn ReadingListRepositoryTrait>,
    settings: tokio::sync::Mutex<SettingsEngine>,
    presenter: BadgePresenter,
    theme: Mutex<ThemeEngine>,
    prompt: TitlePrompt,
    view: Mutex<ViewState>,
}

impl CommandDispatcher {
    pub fn new(
        repository: Arc<dyn ReadingListRepositoryTrait>,
        settings: SettingsEngine,
        presenter: BadgePresenter,
    ) -> Self {
        let is_dark = settings.get_settings().is_dark_mode;
        Self {
            repository,
            settings: tokio::sync::Mutex::new(settings),
            presenter,
            theme: Mutex::new(ThemeEngine::new(is_dark)),
            prompt: TitlePrompt::new(),
            view: Mutex::new(ViewState::default()),
        }
    }

    pub fn presenter(&self) -> &BadgePresenter {
        &self.presenter
    }

    pub fn view_state(&self) -> ViewState {
        self.view().clone()
    }

    pub async fn settings(&self) -> Settings {
        *self.settings.lock().await.get_settings()
    }

    fn view(&self) -> MutexGuard<'_, ViewState> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn theme(&self) -> MutexGuard<'_, ThemeEngine> {
        self.theme.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Handles `command`, containing any failure.
    pub async fn dispatch(&self, command: Command) -> DispatchOutcome {
        log::debug!("dispatching {:?}", command);
        match self.handle(command).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("command failed: {}", e);
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }

    /// Handles `command`, returning the first error encountered.
    pub async fn handle(&self, command: Command) -> Result<DispatchOutcome, DispatchError> {
        match command {
            Command::SavePage { tab } => self.save_page(tab).await,
            Command::OpenTitlePrompt { tab } => {
                let Some(tab) = tab else {
                    log::debug!("no active tab to save");
                    return Ok(DispatchOutcome::Ignored);
                };
                let pending = self.prompt.open(&tab.url, &tab.title);
                Ok(DispatchOutcome::PromptOpened {
                    url: pending.url,
                    default_title: pending.default_title,
                })
            }
            Command::SubmitTitle { input } => {
                let Some(confirmed) = self.prompt.submit(&input) else {
                    return Ok(DispatchOutcome::Ignored);
                };
                self.repository
                    .add(&confirmed.url, &confirmed.title, Some(&confirmed.original_title))
                    .await?;
                self.presenter.refresh().await;
                self.current_view().await
            }
            Command::CancelTitle => Ok(if self.prompt.cancel() {
                DispatchOutcome::Acknowledged
            } else {
                DispatchOutcome::Ignored
            }),
            Command::OpenItem { url } => match self.repository.mark_opened(&url).await? {
                UpdateOutcome::Updated => Ok(DispatchOutcome::Acknowledged),
                UpdateOutcome::NotFound => Ok(DispatchOutcome::Ignored),
            },
            Command::RemoveItem { url } => {
                if self.repository.remove(&url).await? == RemoveOutcome::Removed {
                    self.presenter.refresh().await;
                }
                self.current_view().await
            }
            Command::RenameItem { url, title } => {
                let title = title.trim();
                if title.is_empty() {
                    return Ok(DispatchOutcome::Ignored);
                }
                self.repository.update_title(&url, title).await?;
                self.current_view().await
            }
            Command::ClearAll => {
                self.repository.clear().await?;
                self.presenter.refresh().await;
                self.current_view().await
            }
            Command::SetShowBadge(show) => {
                self.settings
                    .lock()
                    .await
                    .set_value(KEY_SHOW_BADGE, Value::Bool(show))
                    .await?;
                self.presenter.refresh().await;
                Ok(DispatchOutcome::Acknowledged)
            }
            Command::SetNewestFirst(newest_first) => {
                self.settings
                    .lock()
                    .await
                    .set_value(KEY_NEWEST_FIRST, Value::Bool(newest_first))
                    .await?;
                self.current_view().await
            }
            Command::ToggleSort => {
                {
                    let mut settings = self.settings.lock().await;
                    let flipped = !settings.get_settings().newest_first;
                    settings.set_value(KEY_NEWEST_FIRST, Value::Bool(flipped)).await?;
                }
                self.current_view().await
            }
            Command::ToggleSearch => {
                let mut next = self.view_state();
                if next.search_open {
                    next.search_open = false;
                    next.search_term.clear();
                } else {
                    next.search_open = true;
                }
                self.commit_view(next).await
            }
            Command::Search { term } => {
                let mut next = self.view_state();
                next.search_open = next.search_open || !term.trim().is_empty();
                next.search_term = term;
                self.commit_view(next).await
            }
            Command::EnterEditMode => {
                let next = ViewState {
                    edit_mode: true,
                    ..self.view_state()
                };
                self.commit_view(next).await
            }
            Command::ExitEditMode => {
                let next = ViewState {
                    edit_mode: false,
                    ..self.view_state()
                };
                self.commit_view(next).await
            }
            Command::ThemeChanged { is_dark_mode } => self.theme_changed(is_dark_mode).await,
            Command::Export { dir } => self.export(&dir).await,
            Command::Import { text } => {
                let entries = parse_import(&text);
                let summary = self.repository.import(entries).await?;
                if summary.added > 0 {
                    self.presenter.refresh().await;
                }
                Ok(DispatchOutcome::Imported(summary))
            }
            Command::Startup => {
                let settings = self.settings.lock().await.load().await?;
                self.theme().set_dark_mode(settings.is_dark_mode);
                self.presenter.apply_theme(settings.is_dark_mode).await;
                self.presenter.refresh().await;
                Ok(DispatchOutcome::Acknowledged)
            }
            Command::LoadView => self.current_view().await,
        }
    }

    /// Saves the active tab without a prompt and flashes the confirmation badge.
    async fn save_page(&self, tab: Option<ActiveTab>) -> Result<DispatchOutcome, DispatchError> {
        let Some(tab) = tab else {
            log::debug!("save-page without an active tab");
            return Ok(DispatchOutcome::Ignored);
        };

        match self.repository.add(&tab.url, &tab.title, None).await? {
            AddOutcome::Added => {
                self.presenter.confirm_save().await;
                Ok(DispatchOutcome::Acknowledged)
            }
            AddOutcome::AlreadyExists => Ok(DispatchOutcome::Ignored),
        }
    }

    async fn theme_changed(&self, is_dark: bool) -> Result<DispatchOutcome, DispatchError> {
        self.settings
            .lock()
            .await
            .set_value(KEY_IS_DARK_MODE, Value::Bool(is_dark))
            .await?;
        let icons = {
            let mut theme = self.theme();
            theme.set_dark_mode(is_dark);
            theme.pending_icon_updates()
        };
        self.presenter.apply_theme(is_dark).await;
        Ok(DispatchOutcome::ThemeApplied { icons })
    }

    async fn export(&self, dir: &Path) -> Result<DispatchOutcome, DispatchError> {
        let list = self.repository.all().await?;
        let path = write_export(&list, dir)?;
        Ok(DispatchOutcome::Exported(path))
    }

    async fn current_view(&self) -> Result<DispatchOutcome, DispatchError> {
        let state = self.view_state();
        self.render(&state).await.map(DispatchOutcome::View)
    }

    /// Renders with `next` and only then makes it the current view state.
    async fn commit_view(&self, next: ViewState) -> Result<DispatchOutcome, DispatchError> {
        let view = self.render(&next).await?;
        *self.view() = next;
        Ok(DispatchOutcome::View(view))
    }

    async fn render(&self, state: &ViewState) -> Result<ListView, DispatchError> {
        let list = self.repository.all().await?;
        let newest_first = self.settings.lock().await.get_settings().newest_first;
        let projection = project(&list, newest_first, &state.search_term);
        Ok(ListView {
            items: projection.to_vec(),
            count_label: projection.count_label(),
            newest_first,
            search_open: state.search_open,
            search_term: state.search_term.clone(),
            edit_mode: state.edit_mode,
        })
    }
}
