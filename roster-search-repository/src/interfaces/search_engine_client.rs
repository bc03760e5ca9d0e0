//! Search engine client trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, mock, etc.).

use async_trait::async_trait;

use crate::errors::SearchError;
use roster_search_shared::{Collection, IndexDocument, SearchQuery, SearchResponse};

/// Abstract interface for search engine operations.
///
/// This trait defines all the operations the roster search layer needs from a
/// search engine. Writes are not guaranteed to be visible to `search` until
/// `commit` has been called for the collection.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>` for consistent error handling.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Add documents to a collection.
    ///
    /// A document whose id already exists in the collection replaces it.
    ///
    /// # Arguments
    ///
    /// * `collection` - The target collection
    /// * `documents` - The documents to add
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If every document was accepted
    /// * `Err(SearchError::BulkIndexError)` - If any document was rejected
    async fn add_documents(
        &self,
        collection: Collection,
        documents: &[IndexDocument],
    ) -> Result<(), SearchError>;

    /// Make all preceding writes to a collection visible to search.
    async fn commit(&self, collection: Collection) -> Result<(), SearchError>;

    /// Delete documents from a collection by id.
    ///
    /// Ids that do not exist in the collection are ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the documents were deleted (or didn't exist)
    /// * `Err(SearchError)` - If the deletion fails
    async fn delete_documents(
        &self,
        collection: Collection,
        ids: &[String],
    ) -> Result<(), SearchError>;

    /// Execute a query against a collection.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let query = SearchQuery::new("alice");
    /// let response = client.search(Collection::Students, &query).await?;
    /// println!("Found {} results", response.total);
    /// ```
    async fn search(
        &self,
        collection: Collection,
        query: &SearchQuery,
    ) -> Result<SearchResponse, SearchError>;

    /// Ensure a collection exists with proper mappings, creating it if needed.
    ///
    /// This should be called during application startup.
    async fn ensure_collection_exists(&self, collection: Collection) -> Result<(), SearchError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}
