//! Theme Engine: light/dark asset selection for the toolbar and the popup.

use crate::types::badge::IconSet;

/// Badge background colors.
struct BadgePalette;
impl BadgePalette {
    const LIGHT: &'static str = "#666666";
    const DARK: &'static str = "#9aa0a6";
}

const TOOLBAR_LIGHT: IconSet = IconSet {
    size_48: "icons/icon-48.png",
    size_128: "icons/icon-128.png",
    size_256: "icons/icon-256.png",
};

const TOOLBAR_DARK: IconSet = IconSet {
    size_48: "icons/icon-48-dark.png",
    size_128: "icons/icon-128-dark.png",
    size_256: "icons/icon-256-dark.png",
};

/// A popup icon with its light and dark assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemedIcon {
    pub name: &'static str,
    pub light: &'static str,
    pub dark: &'static str,
}

impl ThemedIcon {
    pub fn path(&self, is_dark: bool) -> &'static str {
        if is_dark {
            self.dark
        } else {
            self.light
        }
    }
}

const fn icon(name: &'static str, light: &'static str, dark: &'static str) -> ThemedIcon {
    ThemedIcon { name, light, dark }
}

/// Every icon the popup renders.
pub const POPUP_ICONS: [ThemedIcon; 12] = [
    icon("headerLogo", "icons/icon-256.png", "icons/icon-256-dark.png"),
    icon("search", "icons/search.png", "icons/search-dark.png"),
    icon("edit", "icons/edit.png", "icons/edit-dark.png"),
    icon("done", "icons/done.png", "icons/done-dark.png"),
    icon("search-icon", "icons/search.png", "icons/search-dark.png"),
    icon("sort", "icons/sort.png", "icons/sort-dark.png"),
    icon("settings", "icons/settings.png", "icons/settings-dark.png"),
    icon("add", "icons/add.png", "icons/add-dark.png"),
    icon("back", "icons/back.png", "icons/back-dark.png"),
    icon("backup", "icons/backup.png", "icons/backup-dark.png"),
    icon("restore", "icons/restore.png", "icons/restore-dark.png"),
    icon("clearall", "icons/clearall.png", "icons/clearall-dark.png"),
];

/// Trait defining the theme engine interface.
pub trait ThemeEngineTrait {
    /// Records the OS color scheme. Returns `true` when it changed.
    fn set_dark_mode(&mut self, is_dark: bool) -> bool;
    fn icon_paths(&self) -> Vec<(&'static str, &'static str)>;
}

/// Badge color for a color scheme.
pub fn badge_color(is_dark: bool) -> &'static str {
    if is_dark {
        BadgePalette::DARK
    } else {
        BadgePalette::LIGHT
    }
}

/// Toolbar icon set for a color scheme.
pub fn toolbar_icons(is_dark: bool) -> IconSet {
    if is_dark {
        TOOLBAR_DARK
    } else {
        TOOLBAR_LIGHT
    }
}

/// Tracks the current scheme and the popup icon paths last handed out.
pub struct ThemeEngine {
    is_dark: bool,
    applied: Vec<(&'static str, &'static str)>,
}

impl ThemeEngine {
    pub fn new(is_dark: bool) -> Self {
        Self {
            is_dark,
            applied: Vec::new(),
        }
    }

    /// Popup icons whose path differs from what was last applied.
    ///
    /// An icon already showing the right asset is left out, so a repeated call
    /// with an unchanged scheme returns nothing.
    pub fn pending_icon_updates(&mut self) -> Vec<(&'static str, &'static str)> {
        let wanted = self.icon_paths();
        let changed: Vec<_> = wanted
            .iter()
            .filter(|entry| !self.applied.contains(entry))
            .copied()
            .collect();
        self.applied = wanted;
        changed
    }
}

impl Default for ThemeEngine {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ThemeEngineTrait for ThemeEngine {
    fn set_dark_mode(&mut self, is_dark: bool) -> bool {
        let changed = self.is_dark != is_dark;
        self.is_dark = is_dark;
        changed
    }

    fn icon_paths(&self) -> Vec<(&'static str, &'static str)> {
        POPUP_ICONS
            .iter()
            .map(|icon| (icon.name, icon.path(self.is_dark)))
            .collect()
    }
}
