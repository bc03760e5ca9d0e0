//! Configuration and dependency wiring for roster search.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;

use crate::errors::RosterSearchError;

/// Default maximum number of documents sent to the search engine per request.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Configuration for the search manager.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Search engine URL. The search service is inactive when absent or empty.
    pub search_service_host: Option<String>,
    /// Maximum number of documents sent in a single write request.
    pub max_batch_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_service_host: None,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl SearchConfig {
    /// Create a config pointing at the given search service host.
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            search_service_host: Some(host.into()),
            ..Self::default()
        }
    }

    /// Set the maximum batch size.
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Read the configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_SERVICE_HOST`: search engine URL (unset or empty disables search)
    /// - `SEARCH_MAX_BATCH_SIZE`: documents per write request (default: 1000)
    pub fn from_env() -> Result<Self, RosterSearchError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, RosterSearchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let search_service_host = lookup("SEARCH_SERVICE_HOST")
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty());

        let max_batch_size = match lookup("SEARCH_MAX_BATCH_SIZE") {
            Some(value) => {
                let size = value.trim().parse::<usize>().map_err(|e| {
                    RosterSearchError::config(format!(
                        "Invalid SEARCH_MAX_BATCH_SIZE '{}': {}",
                        value, e
                    ))
                })?;
                if size == 0 {
                    return Err(RosterSearchError::config(
                        "SEARCH_MAX_BATCH_SIZE must be greater than 0",
                    ));
                }
                size
            }
            None => DEFAULT_MAX_BATCH_SIZE,
        };

        Ok(Self {
            search_service_host,
            max_batch_size,
        })
    }

    /// Whether a search service host is configured.
    pub fn is_search_service_active(&self) -> bool {
        self.search_service_host
            .as_deref()
            .is_some_and(|host| !host.is_empty())
    }
}
