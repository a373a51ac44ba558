//! Export and import of the reading list.
//!
//! Export writes the list as a pretty-printed JSON array. Import accepts
//! either such an array (or an array of plain url strings) or a text file
//! with one url per line. Input that is neither yields no entries.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::errors::ExchangeError;
use crate::types::reading_item::{ImportEntry, ReadingItem};

/// File name used for exports.
pub const EXPORT_FILE_NAME: &str = "readlater-list.json";

/// Serializes the list as an indented JSON array.
pub fn export_json(list: &[ReadingItem]) -> Result<String, ExchangeError> {
    serde_json::to_string_pretty(list).map_err(|e| ExchangeError::Serialization(e.to_string()))
}

/// Writes the export file into `dir`, creating the directory if needed.
pub fn write_export(list: &[ReadingItem], dir: &Path) -> Result<PathBuf, ExchangeError> {
    fs::create_dir_all(dir)
        .map_err(|e| ExchangeError::Io(format!("Failed to create export directory: {}", e)))?;

    let path = dir.join(EXPORT_FILE_NAME);
    let json = export_json(list)?;
    fs::write(&path, json)
        .map_err(|e| ExchangeError::Io(format!("Failed to write export file: {}", e)))?;

    log::info!("exported {} pages to {}", list.len(), path.display());
    Ok(path)
}

/// Parses an import file. Never fails: unusable input gives an empty vector.
pub fn parse_import(text: &str) -> Vec<ImportEntry> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(values)) => values.iter().filter_map(entry_from_json).collect(),
        _ => {
            log::debug!("import is not a JSON array, reading it as a url list");
            parse_url_lines(text)
        }
    }
}

fn is_web_url(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}

fn parse_url_lines(text: &str) -> Vec<ImportEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| is_web_url(line))
        .map(ImportEntry::from_url)
        .collect()
}

fn non_empty_str<'a>(object: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn entry_from_json(value: &Value) -> Option<ImportEntry> {
    match value {
        Value::String(url) if is_web_url(url.trim()) => Some(ImportEntry::from_url(url.trim())),
        Value::Object(object) => {
            let url = non_empty_str(object, "url")?;
            let date = non_empty_str(object, "date")
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|dt| dt.with_timezone(&Utc));
            Some(ImportEntry {
                url: url.to_string(),
                title: non_empty_str(object, "title").map(str::to_string),
                original_title: non_empty_str(object, "originalTitle").map(str::to_string),
                date,
            })
        }
        _ => None,
    }
}
