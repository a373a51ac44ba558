// Read Later platform abstraction
// Resolves where the durable store lives on Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` to select the platform-specific implementation at
// compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "READLATER_DATA_DIR";

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "readlater.db";

/// Returns the platform-specific data directory for Read Later.
///
/// - **Linux**: `~/.local/share/readlater` (or `$XDG_DATA_HOME/readlater`)
/// - **macOS**: `~/Library/Application Support/ReadLater`
/// - **Windows**: `%APPDATA%/ReadLater`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}

/// Picks the data directory: an explicit override wins over the platform default.
pub fn resolve_data_dir(override_dir: Option<String>) -> PathBuf {
    match override_dir.filter(|d| !d.trim().is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => get_data_dir(),
    }
}

/// Path of the database file, honoring `READLATER_DATA_DIR`.
pub fn database_path() -> PathBuf {
    resolve_data_dir(std::env::var(DATA_DIR_ENV).ok()).join(DATABASE_FILE)
}
