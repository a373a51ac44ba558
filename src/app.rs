//! App Core for Read Later.
//!
//! Wires the store, repository, presenter and dispatcher for one context.
//! An `App` is built once when the context starts and lives as long as it.

use std::path::Path;
use std::sync::Arc;

use crate::dispatcher::CommandDispatcher;
use crate::managers::list_repository::{ReadingListRepository, ReadingListRepositoryTrait};
use crate::services::badge_presenter::{BadgePresenter, BadgeSurface, PresenterTimings};
use crate::services::settings_engine::SettingsEngine;
use crate::storage::{KeyValueStore, SqliteStore};
use crate::types::command::{Command, DispatchOutcome};
use crate::types::errors::StorageError;

pub struct App {
    pub store: Arc<dyn KeyValueStore>,
    pub repository: Arc<ReadingListRepository>,
    pub dispatcher: CommandDispatcher,
}

impl App {
    /// Opens the durable store at `db_path`, creating parent directories.
    pub fn open(db_path: &Path, surface: Arc<dyn BadgeSurface>) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Unavailable(format!("Failed to create data directory: {}", e))
            })?;
        }
        let store = SqliteStore::open(db_path)?;
        Ok(Self::with_store(Arc::new(store), surface, PresenterTimings::default()))
    }

    /// Builds an app over an existing store.
    pub fn with_store(
        store: Arc<dyn KeyValueStore>,
        surface: Arc<dyn BadgeSurface>,
        timings: PresenterTimings,
    ) -> Self {
        let repository = Arc::new(ReadingListRepository::new(store.clone()));
        let presenter = BadgePresenter::with_timings(store.clone(), surface, timings);
        let settings = SettingsEngine::new(store.clone());
        let dispatcher = CommandDispatcher::new(
            repository.clone() as Arc<dyn ReadingListRepositoryTrait>,
            settings,
            presenter,
        );
        Self {
            store,
            repository,
            dispatcher,
        }
    }

    /// Loads settings and paints the toolbar for the cached theme and count.
    pub async fn start(&self) -> DispatchOutcome {
        self.dispatcher.dispatch(Command::Startup).await
    }
}
