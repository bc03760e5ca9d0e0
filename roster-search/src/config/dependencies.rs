//! Dependency initialization and wiring for roster search.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::SearchConfig;
use crate::errors::RosterSearchError;
use crate::search_manager::SearchManager;
use crate::storage::RosterStore;
use roster_search_repository::{OpenSearchClient, SearchEngineClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured search manager, active only when a host is configured.
    pub search_manager: SearchManager,
}

impl Dependencies {
    /// Initialize all dependencies from the environment.
    ///
    /// Loads `.env` if present, then reads `SearchConfig::from_env`.
    pub async fn new(store: Arc<dyn RosterStore>) -> Result<Self, RosterSearchError> {
        dotenv::dotenv().ok();
        let config = SearchConfig::from_env()?;
        Self::from_config(&config, store).await
    }

    /// Initialize all dependencies from an explicit configuration.
    ///
    /// When a search service host is configured, the search engine must be
    /// reachable and healthy, and both collections are created if missing.
    pub async fn from_config(
        config: &SearchConfig,
        store: Arc<dyn RosterStore>,
    ) -> Result<Self, RosterSearchError> {
        let host = match &config.search_service_host {
            Some(host) if config.is_search_service_active() => host,
            _ => {
                warn!("SEARCH_SERVICE_HOST is not set, search is disabled");
                return Ok(Self {
                    search_manager: SearchManager::with_client(None, store, config.max_batch_size),
                });
            }
        };

        info!(
            search_service_host = %host,
            max_batch_size = config.max_batch_size,
            "Initializing dependencies"
        );

        let client = OpenSearchClient::new(host).map_err(|e| {
            RosterSearchError::config(format!("Failed to create OpenSearch client: {}", e))
        })?;

        let healthy = client.health_check().await.map_err(|e| {
            RosterSearchError::config(format!("OpenSearch health check failed: {}", e))
        })?;
        if !healthy {
            return Err(RosterSearchError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        let client: Arc<dyn SearchEngineClient> = Arc::new(client);
        let search_manager =
            SearchManager::with_client(Some(client), store, config.max_batch_size);
        search_manager.ensure_collections().await?;

        Ok(Self { search_manager })
    }
}
