// Read Later Settings Engine
// Loads and updates the user settings kept in the key-value store.
// Each setting lives under its own key so the badge logic can read them directly.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::storage::{entry, KeyValueStore, StoreMap};
use crate::types::errors::SettingsError;
use crate::types::settings::{
    Settings, KEY_IS_DARK_MODE, KEY_NEWEST_FIRST, KEY_SHOW_BADGE, SETTING_KEYS,
};

/// Trait defining the settings engine interface.
#[async_trait]
pub trait SettingsEngineTrait: Send {
    async fn load(&mut self) -> Result<Settings, SettingsError>;
    fn get_settings(&self) -> &Settings;
    async fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    async fn reset(&mut self) -> Result<(), SettingsError>;
}

/// Settings engine backed by the shared key-value store.
pub struct SettingsEngine {
    store: Arc<dyn KeyValueStore>,
    settings: Settings,
}

impl SettingsEngine {
    /// Creates an engine holding default settings until `load` is called.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            settings: Settings::default(),
        }
    }

    fn flag(found: &StoreMap, key: &str, default: bool) -> bool {
        match found.get(key) {
            None | Some(Value::Null) => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                log::warn!("ignoring non-boolean value {} for '{}'", other, key);
                default
            }
        }
    }

    fn apply(settings: &mut Settings, key: &str, value: bool) {
        match key {
            KEY_SHOW_BADGE => settings.show_badge = value,
            KEY_NEWEST_FIRST => settings.newest_first = value,
            KEY_IS_DARK_MODE => settings.is_dark_mode = value,
            _ => {}
        }
    }
}

#[async_trait]
impl SettingsEngineTrait for SettingsEngine {
    fn get_settings(&self) -> &Settings {
        &self.settings
    }

    /// Loads settings, using defaults for keys that were never written.
    async fn load(&mut self) -> Result<Settings, SettingsError> {
        let found = self.store.get(&SETTING_KEYS).await?;
        let defaults = Settings::default();
        self.settings = Settings {
            show_badge: Self::flag(&found, KEY_SHOW_BADGE, defaults.show_badge),
            newest_first: Self::flag(&found, KEY_NEWEST_FIRST, defaults.newest_first),
            is_dark_mode: Self::flag(&found, KEY_IS_DARK_MODE, defaults.is_dark_mode),
        };
        Ok(self.settings)
    }

    /// Updates and persists a single setting.
    ///
    /// `key` must be one of the store keys (`showBadge`, `newestFirst`,
    /// `isDarkMode`) and `value` a boolean.
    async fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }
        if !SETTING_KEYS.contains(&key) {
            return Err(SettingsError::InvalidKey(format!(
                "Key '{}' not found in settings",
                key
            )));
        }
        let Some(flag) = value.as_bool() else {
            return Err(SettingsError::InvalidValue(format!(
                "Invalid value for key '{}': expected a boolean, got {}",
                key, value
            )));
        };

        self.store.set(entry(key, Value::Bool(flag))).await?;
        Self::apply(&mut self.settings, key, flag);
        Ok(())
    }

    /// Restores every setting to its default and persists them.
    async fn reset(&mut self) -> Result<(), SettingsError> {
        let defaults = Settings::default();
        let mut data = StoreMap::new();
        data.insert(KEY_SHOW_BADGE.to_string(), Value::Bool(defaults.show_badge));
        data.insert(KEY_NEWEST_FIRST.to_string(), Value::Bool(defaults.newest_first));
        data.insert(KEY_IS_DARK_MODE.to_string(), Value::Bool(defaults.is_dark_mode));
        self.store.set(data).await?;
        self.settings = defaults;
        Ok(())
    }
}
