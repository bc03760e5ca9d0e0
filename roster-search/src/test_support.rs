//! Shared fixtures for unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::storage::{InMemoryRosterStore, StoreSession};
use roster_search_repository::{SearchEngineClient, SearchError};
use roster_search_shared::{Collection, IndexDocument, SearchQuery, SearchResponse};

/// Project id used by every test datastore.
pub const TEST_PROJECT_ID: &str = "roster-search-test";

/// A datastore with all entity kinds registered and a session open.
///
/// The session is closed when the fixture is dropped or torn down.
pub struct DatastoreFixture {
    store: Arc<InMemoryRosterStore>,
    session: Option<StoreSession>,
}

impl DatastoreFixture {
    pub fn setup() -> Self {
        let store = Arc::new(InMemoryRosterStore::new(TEST_PROJECT_ID));
        store
            .register_entity_kinds()
            .expect("registering entity kinds on a fresh store");
        let session = store.begin();
        Self {
            store,
            session: Some(session),
        }
    }

    pub fn store(&self) -> &InMemoryRosterStore {
        &self.store
    }

    pub fn shared_store(&self) -> Arc<InMemoryRosterStore> {
        Arc::clone(&self.store)
    }

    /// Close the session and hand back the store.
    pub fn tear_down(mut self) -> Arc<InMemoryRosterStore> {
        if let Some(session) = self.session.take() {
            session.close();
        }
        Arc::clone(&self.store)
    }
}

/// A call received by `MockSearchEngine`.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Add(Collection, Vec<IndexDocument>),
    Commit(Collection),
    Delete(Collection, Vec<String>),
    Search(Collection, SearchQuery),
    EnsureCollection(Collection),
}

/// Engine operation a `MockSearchEngine` can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineOp {
    Add,
    Commit,
    Delete,
    Search,
    EnsureCollection,
    HealthCheck,
}

/// Search engine recording every call and answering searches with a canned response.
#[derive(Default)]
pub struct MockSearchEngine {
    pub calls: Arc<Mutex<Vec<EngineCall>>>,
    pub response: SearchResponse,
    pub fail_on: HashSet<EngineOp>,
    /// Number of add calls that succeed before adds start failing.
    pub adds_before_failure: Option<usize>,
    adds: AtomicUsize,
}

impl MockSearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every operation.
    pub fn failing() -> Self {
        Self::failing_on(&[
            EngineOp::Add,
            EngineOp::Commit,
            EngineOp::Delete,
            EngineOp::Search,
            EngineOp::EnsureCollection,
            EngineOp::HealthCheck,
        ])
    }

    pub fn failing_on(ops: &[EngineOp]) -> Self {
        Self {
            fail_on: ops.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Let the first `count` adds succeed and fail every later one.
    pub fn failing_add_after(count: usize) -> Self {
        Self {
            adds_before_failure: Some(count),
            ..Self::default()
        }
    }

    pub fn with_response(response: SearchResponse) -> Self {
        Self {
            response,
            ..Self::default()
        }
    }

    pub async fn recorded(&self) -> Vec<EngineCall> {
        self.calls.lock().await.clone()
    }

    fn fails(&self, op: EngineOp) -> bool {
        self.fail_on.contains(&op)
    }
}

#[async_trait]
impl SearchEngineClient for MockSearchEngine {
    async fn add_documents(
        &self,
        collection: Collection,
        documents: &[IndexDocument],
    ) -> Result<(), SearchError> {
        self.calls
            .lock()
            .await
            .push(EngineCall::Add(collection, documents.to_vec()));
        let previous = self.adds.fetch_add(1, Ordering::SeqCst);
        let exhausted = self
            .adds_before_failure
            .is_some_and(|count| previous >= count);
        if self.fails(EngineOp::Add) || exhausted {
            return Err(SearchError::bulk_index("Mock failure"));
        }
        Ok(())
    }

    async fn commit(&self, collection: Collection) -> Result<(), SearchError> {
        self.calls.lock().await.push(EngineCall::Commit(collection));
        if self.fails(EngineOp::Commit) {
            return Err(SearchError::commit("Mock failure"));
        }
        Ok(())
    }

    async fn delete_documents(
        &self,
        collection: Collection,
        ids: &[String],
    ) -> Result<(), SearchError> {
        self.calls
            .lock()
            .await
            .push(EngineCall::Delete(collection, ids.to_vec()));
        if self.fails(EngineOp::Delete) {
            return Err(SearchError::delete("Mock failure"));
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: Collection,
        query: &SearchQuery,
    ) -> Result<SearchResponse, SearchError> {
        self.calls
            .lock()
            .await
            .push(EngineCall::Search(collection, query.clone()));
        if self.fails(EngineOp::Search) {
            return Err(SearchError::query("Mock failure"));
        }
        Ok(self.response.clone())
    }

    async fn ensure_collection_exists(&self, collection: Collection) -> Result<(), SearchError> {
        self.calls
            .lock()
            .await
            .push(EngineCall::EnsureCollection(collection));
        if self.fails(EngineOp::EnsureCollection) {
            return Err(SearchError::index_creation("Mock failure"));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(!self.fails(EngineOp::HealthCheck))
    }
}
