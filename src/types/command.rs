use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::reading_item::{ImportSummary, ReadingItem};

/// Name of the keyboard command that saves the active page.
pub const SAVE_PAGE_COMMAND: &str = "save-page";

/// The page currently shown in the active tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTab {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Every event the popup, keyboard command or background context can raise.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Keyboard/background save: stores the tab as-is and flashes the badge.
    SavePage { tab: Option<ActiveTab> },
    /// Popup save: opens the title prompt pre-filled with the tab title.
    OpenTitlePrompt { tab: Option<ActiveTab> },
    SubmitTitle { input: String },
    CancelTitle,
    OpenItem { url: String },
    RemoveItem { url: String },
    RenameItem { url: String, title: String },
    ClearAll,
    SetShowBadge(bool),
    SetNewestFirst(bool),
    ToggleSort,
    ToggleSearch,
    Search { term: String },
    EnterEditMode,
    ExitEditMode,
    ThemeChanged { is_dark_mode: bool },
    Export { dir: PathBuf },
    Import { text: String },
    /// Context start: apply the cached theme and the badge count.
    Startup,
    LoadView,
}

/// Messages exchanged between the popup and the background context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuntimeMessage {
    #[serde(rename_all = "camelCase")]
    ThemeChanged { is_dark_mode: bool },
}

impl From<RuntimeMessage> for Command {
    fn from(message: RuntimeMessage) -> Self {
        match message {
            RuntimeMessage::ThemeChanged { is_dark_mode } => Command::ThemeChanged { is_dark_mode },
        }
    }
}

/// Maps a named keyboard command onto a `Command`. Unknown names yield `None`.
pub fn keyboard_command(name: &str, tab: Option<ActiveTab>) -> Option<Command> {
    match name {
        SAVE_PAGE_COMMAND => Some(Command::SavePage { tab }),
        _ => None,
    }
}

/// What the popup renders after a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub items: Vec<ReadingItem>,
    pub count_label: String,
    pub newest_first: bool,
    pub search_open: bool,
    pub search_term: String,
    pub edit_mode: bool,
}

/// Result of dispatching a command.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    View(ListView),
    PromptOpened { url: String, default_title: String },
    Exported(PathBuf),
    Imported(ImportSummary),
    /// Popup icons that must switch asset after a theme change, as (name, path).
    ThemeApplied { icons: Vec<(&'static str, &'static str)> },
    Acknowledged,
    /// The command had nothing to act on (no active tab, prompt already resolved).
    Ignored,
    /// The command failed; the error was logged and state left unchanged.
    Failed(String),
}
