use std::fmt;

// === StorageError ===

/// Errors raised by the key-value store.
#[derive(Debug)]
pub enum StorageError {
    /// The backing store could not be reached or refused the operation.
    Unavailable(String),
    /// A value could not be encoded for storage or decoded from it.
    Serialization(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            StorageError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Unavailable(e.to_string())
    }
}

// === ReadingListError ===

/// Errors related to reading list operations.
#[derive(Debug)]
pub enum ReadingListError {
    /// The store failed while reading or writing the list.
    Storage(StorageError),
    /// The stored list exists but is not a valid list of items.
    Corrupt(String),
}

impl fmt::Display for ReadingListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingListError::Storage(e) => write!(f, "Reading list storage error: {}", e),
            ReadingListError::Corrupt(msg) => write!(f, "Reading list is corrupt: {}", msg),
        }
    }
}

impl std::error::Error for ReadingListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadingListError::Storage(e) => Some(e),
            ReadingListError::Corrupt(_) => None,
        }
    }
}

impl From<StorageError> for ReadingListError {
    fn from(e: StorageError) -> Self {
        ReadingListError::Storage(e)
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// The store failed while reading or writing settings.
    Storage(StorageError),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Storage(e) => write!(f, "Settings storage error: {}", e),
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for SettingsError {
    fn from(e: StorageError) -> Self {
        SettingsError::Storage(e)
    }
}

// === SurfaceError ===

/// A write to the toolbar (badge text, color, icon) failed.
#[derive(Debug)]
pub struct SurfaceError(pub String);

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Surface write failed: {}", self.0)
    }
}

impl std::error::Error for SurfaceError {}

// === ExchangeError ===

/// Errors related to exporting the list to a file.
#[derive(Debug)]
pub enum ExchangeError {
    /// Writing the export file failed.
    Io(String),
    /// The list could not be encoded as JSON.
    Serialization(String),
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeError::Io(msg) => write!(f, "Export I/O error: {}", msg),
            ExchangeError::Serialization(msg) => write!(f, "Export serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ExchangeError {}

// === DispatchError ===

/// Errors surfaced by the command dispatcher before they are contained.
#[derive(Debug)]
pub enum DispatchError {
    ReadingList(ReadingListError),
    Settings(SettingsError),
    Exchange(ExchangeError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::ReadingList(e) => write!(f, "{}", e),
            DispatchError::Settings(e) => write!(f, "{}", e),
            DispatchError::Exchange(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::ReadingList(e) => Some(e),
            DispatchError::Settings(e) => Some(e),
            DispatchError::Exchange(e) => Some(e),
        }
    }
}

impl From<ReadingListError> for DispatchError {
    fn from(e: ReadingListError) -> Self {
        DispatchError::ReadingList(e)
    }
}

impl From<SettingsError> for DispatchError {
    fn from(e: SettingsError) -> Self {
        DispatchError::Settings(e)
    }
}

impl From<ExchangeError> for DispatchError {
    fn from(e: ExchangeError) -> Self {
        DispatchError::Exchange(e)
    }
}
