//! Proxy to the search service.
//!
//! `SearchManager` is the single entry point the application uses to keep
//! the search engine in sync with the roster and to search it. When no search
//! service is configured, writes are logged and skipped and searches fail
//! with `SearchManagerError::SearchNotImplemented`.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::config::SearchConfig;
use crate::errors::SearchManagerError;
use crate::search_documents::{
    resolve_courses, InstructorSearchDocument, StudentSearchDocument, FIELD_COURSE_ID,
};
use crate::storage::RosterStore;
use roster_search_repository::{OpenSearchClient, SearchEngineClient, SearchError};
use roster_search_shared::{
    Collection, FieldFilter, IndexDocument, InstructorAttributes, InstructorSearchResultBundle,
    SearchQuery, StudentAttributes, StudentSearchResultBundle,
};

pub const ERROR_SEARCH_NOT_IMPLEMENTED: &str = "Search service is not implemented";

fn put_document_error(ids: &[&str], cause: &SearchError) -> String {
    format!(
        "Failed to put document(s) {:?} into the search service. Root cause: {}",
        ids, cause
    )
}

/// Acts as a proxy to the search service.
pub struct SearchManager {
    client: Option<Arc<dyn SearchEngineClient>>,
    store: Arc<dyn RosterStore>,
    max_batch_size: usize,
}

impl SearchManager {
    /// Create a search manager from configuration.
    ///
    /// An OpenSearch client is created only when a search service host is
    /// configured; otherwise the manager is inactive.
    pub fn new(config: &SearchConfig, store: Arc<dyn RosterStore>) -> Result<Self, SearchError> {
        let client: Option<Arc<dyn SearchEngineClient>> = match &config.search_service_host {
            Some(host) if config.is_search_service_active() => {
                Some(Arc::new(OpenSearchClient::new(host)?))
            }
            _ => None,
        };

        Ok(Self::with_client(client, store, config.max_batch_size))
    }

    /// Create a search manager around an existing client, or an inactive one for `None`.
    pub fn with_client(
        client: Option<Arc<dyn SearchEngineClient>>,
        store: Arc<dyn RosterStore>,
        max_batch_size: usize,
    ) -> Self {
        Self {
            client,
            store,
            max_batch_size: max_batch_size.max(1),
        }
    }

    /// Whether a search service is configured.
    pub fn is_active(&self) -> bool {
        self.client.is_some()
    }

    fn active_client(&self) -> Option<&dyn SearchEngineClient> {
        self.client.as_deref()
    }

    /// Create the student and instructor collections if they don't exist yet.
    ///
    /// Does nothing when the search service is inactive.
    pub async fn ensure_collections(&self) -> Result<(), SearchManagerError> {
        let Some(client) = self.active_client() else {
            return Ok(());
        };

        for collection in [Collection::Students, Collection::Instructors] {
            client.ensure_collection_exists(collection).await?;
        }
        Ok(())
    }

    /// Search for students.
    ///
    /// `instructors` restricts the results to the courses of those
    /// instructors. `None` searches every course.
    #[instrument(skip(self, instructors))]
    pub async fn search_students(
        &self,
        query: &str,
        instructors: Option<&[InstructorAttributes]>,
    ) -> Result<StudentSearchResultBundle, SearchManagerError> {
        let client = self
            .active_client()
            .ok_or(SearchManagerError::SearchNotImplemented)?;

        let mut search_query = SearchQuery::new(query);
        if let Some(instructors) = instructors {
            let mut course_ids: Vec<String> =
                instructors.iter().map(|i| i.course_id.clone()).collect();
            course_ids.sort();
            course_ids.dedup();

            if course_ids.is_empty() {
                return Ok(StudentSearchResultBundle::new());
            }
            search_query = search_query.with_filter(FieldFilter::new(FIELD_COURSE_ID, course_ids));
        }

        let response = client.search(Collection::Students, &search_query).await?;
        let mapping = StudentSearchDocument::from_response(Some(response), &*self.store).await?;

        if !mapping.stale_ids.is_empty() {
            warn!(
                count = mapping.stale_ids.len(),
                "Removing student documents without a matching student"
            );
            self.delete_student_search_documents(&mapping.stale_ids)
                .await;
        }

        Ok(mapping.bundle)
    }

    /// Batch create or update search documents for the given students.
    #[instrument(skip(self, students), fields(count = students.len()))]
    pub async fn put_student_search_documents(&self, students: &[StudentAttributes]) {
        let Some(client) = self.active_client() else {
            error!("{}", ERROR_SEARCH_NOT_IMPLEMENTED);
            return;
        };
        if students.is_empty() {
            return;
        }

        let courses =
            resolve_courses(&*self.store, students.iter().map(|s| s.course.as_str())).await;
        let documents: Vec<IndexDocument> = students
            .iter()
            .map(|s| StudentSearchDocument::new(s).to_document(courses.get(&s.course)))
            .collect();

        self.add_documents_to_collection(client, Collection::Students, &documents)
            .await;
    }

    /// Remove student search documents with the given registration keys.
    #[instrument(skip(self, keys), fields(count = keys.len()))]
    pub async fn delete_student_search_documents(&self, keys: &[String]) {
        let Some(client) = self.active_client() else {
            error!("{}", ERROR_SEARCH_NOT_IMPLEMENTED);
            return;
        };

        self.delete_documents_from_collection(client, Collection::Students, keys)
            .await;
    }

    /// Search for instructors in every course.
    #[instrument(skip(self))]
    pub async fn search_instructors(
        &self,
        query: &str,
    ) -> Result<InstructorSearchResultBundle, SearchManagerError> {
        let client = self
            .active_client()
            .ok_or(SearchManagerError::SearchNotImplemented)?;

        let response = client
            .search(Collection::Instructors, &SearchQuery::new(query))
            .await?;
        let mapping =
            InstructorSearchDocument::from_response(Some(response), &*self.store).await?;

        if !mapping.stale_ids.is_empty() {
            warn!(
                count = mapping.stale_ids.len(),
                "Removing instructor documents without a matching instructor"
            );
            self.delete_instructor_search_documents(&mapping.stale_ids)
                .await;
        }

        Ok(mapping.bundle)
    }

    /// Batch create or update search documents for the given instructors.
    #[instrument(skip(self, instructors), fields(count = instructors.len()))]
    pub async fn put_instructor_search_documents(&self, instructors: &[InstructorAttributes]) {
        let Some(client) = self.active_client() else {
            error!("{}", ERROR_SEARCH_NOT_IMPLEMENTED);
            return;
        };
        if instructors.is_empty() {
            return;
        }

        let courses = resolve_courses(
            &*self.store,
            instructors.iter().map(|i| i.course_id.as_str()),
        )
        .await;
        let documents: Vec<IndexDocument> = instructors
            .iter()
            .map(|i| InstructorSearchDocument::new(i).to_document(courses.get(&i.course_id)))
            .collect();

        self.add_documents_to_collection(client, Collection::Instructors, &documents)
            .await;
    }

    /// Remove instructor search documents with the given keys.
    #[instrument(skip(self, keys), fields(count = keys.len()))]
    pub async fn delete_instructor_search_documents(&self, keys: &[String]) {
        let Some(client) = self.active_client() else {
            error!("{}", ERROR_SEARCH_NOT_IMPLEMENTED);
            return;
        };

        self.delete_documents_from_collection(client, Collection::Instructors, keys)
            .await;
    }

    /// Add documents in batches of at most `max_batch_size`, then commit once.
    ///
    /// Stops at the first failed batch. Failures are logged, never returned.
    async fn add_documents_to_collection(
        &self,
        client: &dyn SearchEngineClient,
        collection: Collection,
        documents: &[IndexDocument],
    ) {
        for batch in documents.chunks(self.max_batch_size) {
            if let Err(e) = client.add_documents(collection, batch).await {
                let ids: Vec<&str> = batch.iter().map(|d| d.id.as_str()).collect();
                error!(collection = %collection, "{}", put_document_error(&ids, &e));
                return;
            }
        }

        if let Err(e) = client.commit(collection).await {
            let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
            error!(collection = %collection, "{}", put_document_error(&ids, &e));
            return;
        }

        info!(collection = %collection, count = documents.len(), "Put search documents");
    }

    /// Delete documents in batches of at most `max_batch_size`, then commit once.
    async fn delete_documents_from_collection(
        &self,
        client: &dyn SearchEngineClient,
        collection: Collection,
        ids: &[String],
    ) {
        if ids.is_empty() {
            return;
        }

        for batch in ids.chunks(self.max_batch_size) {
            if let Err(e) = client.delete_documents(collection, batch).await {
                error!(
                    collection = %collection,
                    ids = ?batch,
                    error = %e,
                    "Failed to delete search documents"
                );
                return;
            }
        }

        if let Err(e) = client.commit(collection).await {
            error!(collection = %collection, error = %e, "Failed to commit deletions");
            return;
        }

        debug!(collection = %collection, count = ids.len(), "Deleted search documents");
    }
}
