//! # Roster Search
//!
//! Keeps an external search engine in sync with the student and instructor
//! roster and maps search results back to roster records.
//!
//! ## Modules
//!
//! - [`search_manager`]: proxy used by the application for every search operation
//! - [`search_documents`]: mapping between records and search documents
//! - [`storage`]: datastore access used to resolve search hits
//! - [`config`]: configuration and dependency initialization
//! - [`errors`]: error types

pub mod config;
pub mod errors;
pub mod logging;
pub mod search_documents;
pub mod search_manager;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use config::{Dependencies, SearchConfig};
pub use errors::{RosterSearchError, SearchManagerError, StorageError};
pub use search_manager::SearchManager;
pub use storage::{InMemoryRosterStore, RosterStore};
