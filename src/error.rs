use std::fmt;

/// Error type shared by the cache, migration and log sink code
#[derive(Debug)]
pub enum GeoError {
    /// Cache record could not be decoded
    InvalidCacheEntry,
    /// No cache entry for the given key
    NotFound(String),
    /// Cache key is not usable as a file name
    InvalidKey(String),
    /// IO error
    Io(std::io::Error),
    /// Database operation error
    Database(rusqlite::Error),
    /// Malformed stored entry
    Decode(serde_json::Error),
    /// Configuration error
    Config(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::InvalidCacheEntry => write!(f, "invalid cache entry"),
            GeoError::NotFound(key) => write!(f, "cache entry not found: {}", key),
            GeoError::InvalidKey(key) => write!(f, "invalid cache key: {:?}", key),
            GeoError::Io(err) => write!(f, "IO error: {}", err),
            GeoError::Database(err) => write!(f, "Database error: {}", err),
            GeoError::Decode(err) => write!(f, "Decode error: {}", err),
            GeoError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for GeoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoError::Io(err) => Some(err),
            GeoError::Database(err) => Some(err),
            GeoError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GeoError {
    fn from(err: std::io::Error) -> Self {
        GeoError::Io(err)
    }
}

impl From<rusqlite::Error> for GeoError {
    fn from(err: rusqlite::Error) -> Self {
        GeoError::Database(err)
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::Decode(err)
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;
