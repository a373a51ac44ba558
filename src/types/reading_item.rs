use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single saved page.
///
/// Serialized with the field names the stored list has always used
/// (`originalTitle`, `lastOpened`), so lists written by earlier builds load as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingItem {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis_opt")]
    pub last_opened: Option<DateTime<Utc>>,
}

impl ReadingItem {
    pub fn new(url: &str, title: &str, original_title: Option<&str>, date: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            original_title: original_title.map(str::to_string),
            date,
            last_opened: None,
        }
    }

    /// Title shown in the list; falls back to the url for untitled pages.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

/// Ordered collection of saved pages, in insertion order.
pub type ReadingList = Vec<ReadingItem>;

/// Result of `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

/// Result of `remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Result of in-place edits (`update_title`, `mark_opened`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

/// An entry parsed from an import file, before it is merged into the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportEntry {
    pub url: String,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl ImportEntry {
    pub fn from_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: None,
            original_title: None,
            date: None,
        }
    }
}

/// Counts reported after merging an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub(crate) mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

pub(crate) mod iso_millis_opt {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            Some(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
