//! Error types for the roster search repository.

mod search_error;

pub use search_error::SearchError;
