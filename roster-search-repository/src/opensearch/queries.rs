//! OpenSearch query builders.
//!
//! This module turns an engine-neutral `SearchQuery` into an OpenSearch
//! search body. Relevance is left to OpenSearch.

use serde_json::{json, Value};

use roster_search_shared::{Collection, FieldFilter, SearchQuery};

/// Build an OpenSearch search body from a SearchQuery.
///
/// The body contains:
/// - a `multi_match` over the collection's search fields (or `match_all` for blank text)
/// - a `match_phrase_prefix` on `name` so partially typed names still match
/// - one `terms` filter per `FieldFilter`
/// - `from`/`size` taken from the query's offset and limit
pub fn build_search_query(collection: Collection, query: &SearchQuery) -> Value {
    let text_query = build_text_query(collection, query.text.trim());

    let mut body = json!({
        "from": query.offset,
        "size": query.limit,
        "query": {
            "bool": {
                "must": [text_query]
            }
        }
    });

    if !query.filters.is_empty() {
        body["query"]["bool"]["filter"] =
            Value::Array(query.filters.iter().map(build_terms_filter).collect());
    }

    body
}

/// Build the text part of the query.
fn build_text_query(collection: Collection, text: &str) -> Value {
    if text.is_empty() {
        return json!({ "match_all": {} });
    }

    json!({
        "bool": {
            "should": [
                {
                    "multi_match": {
                        "query": text,
                        "fields": collection.search_fields(),
                        "operator": "and"
                    }
                },
                {
                    "match_phrase_prefix": {
                        "name": {
                            "query": text
                        }
                    }
                }
            ],
            "minimum_should_match": 1
        }
    })
}

fn build_terms_filter(filter: &FieldFilter) -> Value {
    let mut terms = serde_json::Map::new();
    terms.insert(filter.field.clone(), json!(filter.values));
    json!({ "terms": terms })
}
