use serde::{Deserialize, Serialize};

/// Store key holding the serialized reading list.
pub const KEY_READING_LIST: &str = "readingList";
/// Store key for the badge toggle.
pub const KEY_SHOW_BADGE: &str = "showBadge";
/// Store key for the sort direction.
pub const KEY_NEWEST_FIRST: &str = "newestFirst";
/// Store key for the cached OS color scheme.
pub const KEY_IS_DARK_MODE: &str = "isDarkMode";

/// All setting keys, in the order they are reported.
pub const SETTING_KEYS: [&str; 3] = [KEY_SHOW_BADGE, KEY_NEWEST_FIRST, KEY_IS_DARK_MODE];

/// User-facing settings persisted next to the reading list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub show_badge: bool,
    pub newest_first: bool,
    /// Mirrors the OS color scheme; written whenever the popup sees a change.
    pub is_dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_badge: true,
            newest_first: true,
            is_dark_mode: false,
        }
    }
}
