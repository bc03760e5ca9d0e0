//! OpenSearch index configuration and mappings.
//!
//! This module defines the settings and mappings for the student and
//! instructor indices.

use serde_json::{json, Value};

use roster_search_shared::Collection;

/// A text field that can also be filtered and sorted on exactly.
fn text_with_raw() -> Value {
    json!({
        "type": "text",
        "fields": {
            "raw": {
                "type": "keyword"
            }
        }
    })
}

fn keyword() -> Value {
    json!({ "type": "keyword" })
}

/// Get the index settings and mappings for a collection.
///
/// The configuration includes:
/// - **Keyword fields**: ids, emails and grouping fields used for exact lookups and filters
/// - **Text fields**: names, each with a `raw` keyword subfield
///
/// # Sharding Configuration
///
/// - 1 primary shard, rosters are small
/// - 1 replica for redundancy
pub fn get_index_settings(collection: Collection) -> Value {
    let properties = match collection {
        Collection::Students => json!({
            "id": keyword(),
            "name": text_with_raw(),
            "email": keyword(),
            "course_id": keyword(),
            "course_name": text_with_raw(),
            "team": keyword(),
            "section": keyword()
        }),
        Collection::Instructors => json!({
            "id": keyword(),
            "name": text_with_raw(),
            "email": keyword(),
            "course_id": keyword(),
            "course_name": text_with_raw(),
            "google_id": keyword(),
            "role": keyword(),
            "displayed_name": text_with_raw()
        }),
    };

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": properties
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_index_settings_structure() {
        let settings = get_index_settings(Collection::Students);

        assert!(settings["settings"]["number_of_shards"].is_number());
        assert!(settings["settings"]["number_of_replicas"].is_number());

        let properties = &settings["mappings"]["properties"];
        assert_eq!(properties["course_id"]["type"], "keyword");
        assert_eq!(properties["section"]["type"], "keyword");
        assert_eq!(properties["name"]["type"], "text");
        assert_eq!(properties["name"]["fields"]["raw"]["type"], "keyword");
        assert!(properties["role"].is_null());
    }

    #[test]
    fn test_instructor_index_settings_structure() {
        let settings = get_index_settings(Collection::Instructors);

        let properties = &settings["mappings"]["properties"];
        assert_eq!(properties["role"]["type"], "keyword");
        assert_eq!(properties["google_id"]["type"], "keyword");
        assert_eq!(properties["displayed_name"]["type"], "text");
        assert!(properties["team"].is_null());
    }

    #[test]
    fn test_mappings_cover_search_fields() {
        for collection in [Collection::Students, Collection::Instructors] {
            let settings = get_index_settings(collection);
            for field in collection.search_fields() {
                assert!(
                    settings["mappings"]["properties"][*field].is_object(),
                    "{} is not mapped for {}",
                    field,
                    collection
                );
            }
        }
    }
}
