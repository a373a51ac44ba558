// Read Later data path for macOS
// Data: ~/Library/Application Support/ReadLater

use std::path::PathBuf;

pub fn data_dir_from(home: Option<String>) -> PathBuf {
    PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")))
        .join("Library")
        .join("Application Support")
        .join("ReadLater")
}

pub fn get_data_dir() -> PathBuf {
    data_dir_from(std::env::var("HOME").ok())
}
