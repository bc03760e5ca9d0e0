//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client. Each `Collection` lives in its own index.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode,
    },
    indices::{IndicesCreateParts, IndicesExistsParts, IndicesRefreshParts},
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::index_config::get_index_settings;
use crate::opensearch::queries::build_search_query;
use roster_search_shared::{Collection, IndexDocument, SearchHit, SearchQuery, SearchResponse};

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200")?;
/// client.ensure_collection_exists(Collection::Students).await?;
///
/// let document = IndexDocument::new("registration-key").with_field("name", "Alice");
/// client.add_documents(Collection::Students, &[document]).await?;
/// client.commit(Collection::Students).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    index_prefix: String,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or transport setup fails
    pub fn new(url: &str) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self {
            client,
            index_prefix: String::new(),
        })
    }

    /// Prefix every index name, e.g. to keep test runs apart on a shared cluster.
    pub fn with_index_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.index_prefix = prefix.into();
        self
    }

    /// Name of the index backing a collection.
    pub fn index_name(&self, collection: Collection) -> String {
        format!("{}{}", self.index_prefix, collection.name())
    }

    /// Build the NDJSON body of a bulk request indexing the given documents.
    fn bulk_index_body(documents: &[IndexDocument]) -> Vec<JsonBody<Value>> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            body.push(json!({ "index": { "_id": document.id } }).into());
            body.push(document.to_source().into());
        }
        body
    }

    /// Build the NDJSON body of a bulk request deleting the given ids.
    fn bulk_delete_body(ids: &[String]) -> Vec<JsonBody<Value>> {
        ids.iter()
            .map(|id| json!({ "delete": { "_id": id } }).into())
            .collect()
    }

    /// Collect `"{id}: {reason}"` for every failed item of a bulk response.
    ///
    /// Deleting a missing document is reported by OpenSearch as `not_found`
    /// without an `error` entry, so it does not count as a failure.
    fn bulk_failures(body: &Value, operation: &str) -> Vec<String> {
        let Some(items) = body["items"].as_array() else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| {
                let result = &item[operation];
                let error = result.get("error")?;
                let id = result["_id"].as_str().unwrap_or("<unknown>");
                let reason = error["reason"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                Some(format!("{}: {}", id, reason))
            })
            .collect()
    }

    /// Parse a search response body into a SearchResponse.
    /// Interpret the status of an index existence check.
    ///
    /// Only 404 means the index is missing; any other failure status is
    /// reported as a connection error instead of triggering a create.
    fn index_exists_from_status(index: &str, status: StatusCode) -> Result<bool, SearchError> {
        if status.is_success() {
            return Ok(true);
        }
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        error!(index = %index, status = %status, "Index existence check failed");
        Err(SearchError::connection(format!(
            "Index existence check for {} failed with status {}",
            index, status
        )))
    }

    fn parse_search_response(body: &Value) -> Result<SearchResponse, SearchError> {
        let hits = body["hits"]["hits"]
            .as_array()
            .ok_or_else(|| SearchError::parse("Missing hits in search response"))?;

        let hits = hits
            .iter()
            .filter_map(Self::parse_hit)
            .collect::<Vec<_>>();

        // `hits.total` is an object in OpenSearch 1.x+, a number in older clusters
        let total = match &body["hits"]["total"] {
            Value::Object(total) => total.get("value").and_then(Value::as_u64),
            other => other.as_u64(),
        }
        .unwrap_or(hits.len() as u64);

        Ok(SearchResponse { total, hits })
    }

    /// Parse a single hit. Hits without an id are dropped.
    fn parse_hit(hit: &Value) -> Option<SearchHit> {
        let id = hit["_id"].as_str()?.to_string();
        let score = hit["_score"].as_f64().unwrap_or(0.0);
        Some(SearchHit { id, score })
    }

    async fn error_body(response: Response) -> String {
        response.text().await.unwrap_or_default()
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    #[instrument(skip(self, documents), fields(collection = %collection, count = documents.len()))]
    async fn add_documents(
        &self,
        collection: Collection,
        documents: &[IndexDocument],
    ) -> Result<(), SearchError> {
        if documents.is_empty() {
            return Ok(());
        }

        let index = self.index_name(collection);
        let response = self
            .client
            .bulk(BulkParts::Index(&index))
            .body(Self::bulk_index_body(documents))
            .send()
            .await
            .map_err(|e| SearchError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Bulk index request failed");
            return Err(SearchError::bulk_index(format!(
                "Bulk index failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        if body["errors"].as_bool().unwrap_or(false) {
            let failures = Self::bulk_failures(&body, "index");
            warn!(failed = failures.len(), "Bulk index had failures");
            return Err(SearchError::bulk_index(format!(
                "{} of {} documents failed: {}",
                failures.len(),
                documents.len(),
                failures.join("; ")
            )));
        }

        debug!("Documents indexed");
        Ok(())
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn commit(&self, collection: Collection) -> Result<(), SearchError> {
        let index = self.index_name(collection);
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index.as_str()]))
            .send()
            .await
            .map_err(|e| SearchError::commit(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Refresh request failed");
            return Err(SearchError::commit(format!(
                "Refresh failed with status {}: {}",
                status, error_body
            )));
        }

        debug!("Collection refreshed");
        Ok(())
    }

    #[instrument(skip(self, ids), fields(collection = %collection, count = ids.len()))]
    async fn delete_documents(
        &self,
        collection: Collection,
        ids: &[String],
    ) -> Result<(), SearchError> {
        if ids.is_empty() {
            return Ok(());
        }

        let index = self.index_name(collection);
        let response = self
            .client
            .bulk(BulkParts::Index(&index))
            .body(Self::bulk_delete_body(ids))
            .send()
            .await
            .map_err(|e| SearchError::delete(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Bulk delete request failed");
            return Err(SearchError::delete(format!(
                "Bulk delete failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let failures = Self::bulk_failures(&body, "delete");
        if !failures.is_empty() {
            return Err(SearchError::delete(failures.join("; ")));
        }

        debug!("Documents deleted");
        Ok(())
    }

    #[instrument(skip(self, query), fields(collection = %collection))]
    async fn search(
        &self,
        collection: Collection,
        query: &SearchQuery,
    ) -> Result<SearchResponse, SearchError> {
        if query.limit == 0 {
            return Err(SearchError::invalid_query("limit must be greater than 0"));
        }

        let index = self.index_name(collection);
        let response = self
            .client
            .search(SearchParts::Index(&[index.as_str()]))
            .body(build_search_query(collection, query))
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let result = Self::parse_search_response(&body)?;
        debug!(total = result.total, returned = result.hits.len(), "Search completed");
        Ok(result)
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn ensure_collection_exists(&self, collection: Collection) -> Result<(), SearchError> {
        let index = self.index_name(collection);

        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index.as_str()]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if Self::index_exists_from_status(&index, exists.status_code())? {
            debug!(index = %index, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&index))
            .body(get_index_settings(collection))
            .send()
            .await
            .map_err(|e| SearchError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            // Another instance may have created the index since the existence check
            if error_body.contains("resource_already_exists_exception") {
                return Ok(());
            }
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SearchError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %index, "Created index");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let status = body["status"].as_str().unwrap_or("red");
        Ok(status == "green" || status == "yellow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = OpenSearchClient::new("not a url");
        assert!(matches!(result, Err(SearchError::ConnectionError(_))));
    }

    #[test]
    fn test_index_name_with_prefix() {
        let client = OpenSearchClient::new("http://localhost:9200")
            .unwrap()
            .with_index_prefix("test_");

        assert_eq!(client.index_name(Collection::Students), "test_students");
        assert_eq!(client.index_name(Collection::Instructors), "test_instructors");
    }

    #[test]
    fn test_bulk_index_body() {
        let documents = vec![
            IndexDocument::new("k1").with_field("name", "Alice"),
            IndexDocument::new("k2").with_field("name", "Bob"),
        ];

        let body = OpenSearchClient::bulk_index_body(&documents);

        assert_eq!(body.len(), 4);
    }

    #[test]
    fn test_bulk_delete_body() {
        let body = OpenSearchClient::bulk_delete_body(&["k1".to_string(), "k2".to_string()]);
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn test_bulk_failures() {
        let body = json!({
            "errors": true,
            "items": [
                { "index": { "_id": "k1", "status": 201 } },
                {
                    "index": {
                        "_id": "k2",
                        "status": 400,
                        "error": { "type": "mapper_parsing_exception", "reason": "failed to parse" }
                    }
                }
            ]
        });

        let failures = OpenSearchClient::bulk_failures(&body, "index");

        assert_eq!(failures, vec!["k2: failed to parse".to_string()]);
    }

    #[test]
    fn test_bulk_failures_ignores_missing_deletes() {
        let body = json!({
            "errors": false,
            "items": [
                { "delete": { "_id": "k1", "status": 200, "result": "deleted" } },
                { "delete": { "_id": "k2", "status": 404, "result": "not_found" } }
            ]
        });

        assert!(OpenSearchClient::bulk_failures(&body, "delete").is_empty());
    }

    #[test]
    fn test_index_exists_from_status() {
        let exists = OpenSearchClient::index_exists_from_status("students", StatusCode::OK);
        assert!(matches!(exists, Ok(true)));

        let missing = OpenSearchClient::index_exists_from_status("students", StatusCode::NOT_FOUND);
        assert!(matches!(missing, Ok(false)));
    }

    #[test]
    fn test_index_exists_from_status_reports_other_failures() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::SERVICE_UNAVAILABLE] {
            let result = OpenSearchClient::index_exists_from_status("students", status);
            assert!(matches!(result, Err(SearchError::ConnectionError(_))));
        }
    }

    #[test]
    fn test_parse_search_response() {
        let body = json!({
            "hits": {
                "total": { "value": 12, "relation": "eq" },
                "hits": [
                    { "_id": "k1", "_score": 2.5, "_source": { "name": "Alice" } },
                    { "_id": "k2", "_score": 1.0, "_source": { "name": "Bob" } }
                ]
            }
        });

        let response = OpenSearchClient::parse_search_response(&body).unwrap();

        assert_eq!(response.total, 12);
        assert_eq!(response.hits.len(), 2);
        assert_eq!(response.hits[0].id, "k1");
        assert_eq!(response.hits[0].score, 2.5);
    }

    #[test]
    fn test_parse_search_response_legacy_total_and_null_score() {
        let body = json!({
            "hits": {
                "total": 1,
                "hits": [ { "_id": "k1", "_score": null } ]
            }
        });

        let response = OpenSearchClient::parse_search_response(&body).unwrap();

        assert_eq!(response.total, 1);
        assert_eq!(response.hits[0].score, 0.0);
    }

    #[test]
    fn test_parse_search_response_missing_hits() {
        let result = OpenSearchClient::parse_search_response(&json!({ "took": 1 }));
        assert!(matches!(result, Err(SearchError::ParseError(_))));
    }

    #[test]
    fn test_parse_hit_without_id() {
        assert!(OpenSearchClient::parse_hit(&json!({ "_score": 1.0 })).is_none());
    }
}
