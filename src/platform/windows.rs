// Read Later data path for Windows
// Data: %APPDATA%/ReadLater

use std::path::PathBuf;

pub fn data_dir_from(appdata: Option<String>) -> PathBuf {
    PathBuf::from(
        appdata.unwrap_or_else(|| String::from("C:\\Users\\Default\\AppData\\Roaming")),
    )
    .join("ReadLater")
}

pub fn get_data_dir() -> PathBuf {
    data_dir_from(std::env::var("APPDATA").ok())
}
