// Read Later data path for Linux
// Data: $XDG_DATA_HOME/readlater, else ~/.local/share/readlater

use std::path::PathBuf;

/// Resolves the data directory from the given environment values.
pub fn data_dir_from(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    match xdg_data_home.filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg).join("readlater"),
        None => PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")))
            .join(".local")
            .join("share")
            .join("readlater"),
    }
}

pub fn get_data_dir() -> PathBuf {
    data_dir_from(std::env::var("XDG_DATA_HOME").ok(), std::env::var("HOME").ok())
}
