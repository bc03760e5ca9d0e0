//! Engine-neutral search document, query and response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default number of hits requested per query.
pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// A collection of search documents on the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    Instructors,
}

impl Collection {
    /// Name of the collection on the search engine.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Instructors => "instructors",
        }
    }

    /// Fields matched by full-text queries against this collection.
    pub fn search_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Students => &[
                "name",
                "email",
                "course_id",
                "course_name",
                "team",
                "section",
            ],
            Collection::Instructors => &[
                "name",
                "email",
                "course_id",
                "course_name",
                "google_id",
                "role",
                "displayed_name",
            ],
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A flat key-value document as stored on the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Document id, unique within a collection.
    pub id: String,
    /// Document fields, not including the id.
    pub fields: Map<String, Value>,
}

impl IndexDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Add a field, replacing any previous value under the same name.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field as a string, if present and a string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// The document body as sent to the engine, with the id included.
    pub fn to_source(&self) -> Value {
        let mut source = self.fields.clone();
        source.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(source)
    }
}

/// Restricts a query to documents whose `field` holds one of `values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub values: Vec<String>,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            field: field.into(),
            values,
        }
    }
}

/// A full-text query against one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// The raw query text, passed to the engine as is.
    pub text: String,
    pub filters: Vec<FieldFilter>,
    pub limit: usize,
    pub offset: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filters: Vec::new(),
            limit: DEFAULT_QUERY_LIMIT,
            offset: 0,
        }
    }

    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// A single hit in a search response.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
}

/// Hits returned by the search engine, in engine order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Total number of matching documents, may exceed `hits.len()`.
    pub total: u64,
    pub hits: Vec<SearchHit>,
}
