//! Error types for the roster search layer.

use roster_search_repository::SearchError;
use thiserror::Error;

/// Errors raised by the datastore behind `RosterStore`.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// No datastore session is open.
    #[error("No active datastore session")]
    NoActiveSession,

    /// The entity kind was never registered with the datastore.
    #[error("Entity kind not registered: {0}")]
    UnregisteredKind(String),

    /// Any other datastore failure.
    #[error("Datastore error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Errors returned by `SearchManager` searches.
///
/// Write operations never return errors; they log and return.
#[derive(Error, Debug)]
pub enum SearchManagerError {
    /// No search service is configured.
    #[error("Search service is not implemented")]
    SearchNotImplemented,

    /// The search engine rejected or failed the request.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// A record lookup failed while mapping search results.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors that can occur while configuring or running the binary.
#[derive(Error, Debug)]
pub enum RosterSearchError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchManagerError),

    /// Roster file could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RosterSearchError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<StorageError> for RosterSearchError {
    fn from(err: StorageError) -> Self {
        Self::SearchError(SearchManagerError::Storage(err))
    }
}
