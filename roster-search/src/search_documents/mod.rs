//! Mapping between roster records and search documents.
//!
//! Each record type has a search document type that knows how to flatten a
//! record into an `IndexDocument` and how to turn a `SearchResponse` back
//! into a sorted result bundle.

mod instructor;
mod student;

pub use instructor::InstructorSearchDocument;
pub use student::StudentSearchDocument;

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::storage::RosterStore;
use roster_search_shared::CourseAttributes;

pub const FIELD_NAME: &str = "name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_COURSE_ID: &str = "course_id";
pub const FIELD_COURSE_NAME: &str = "course_name";
pub const FIELD_TEAM: &str = "team";
pub const FIELD_SECTION: &str = "section";
pub const FIELD_GOOGLE_ID: &str = "google_id";
pub const FIELD_ROLE: &str = "role";
pub const FIELD_DISPLAYED_NAME: &str = "displayed_name";

/// A result bundle together with the hits that no longer have a record.
///
/// Stale ids appear when the search engine is out of sync with the
/// datastore, typically because an earlier delete failed.
#[derive(Debug, Clone, Default)]
pub struct ResponseMapping<B> {
    pub bundle: B,
    pub stale_ids: Vec<String>,
}

/// Look up every distinct course once.
///
/// Missing courses are left out of the map. Lookup failures are logged and
/// treated as missing, so documents are still written without a course name.
pub async fn resolve_courses<'a, I>(
    store: &dyn RosterStore,
    course_ids: I,
) -> HashMap<String, CourseAttributes>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut courses = HashMap::new();
    let mut seen = HashSet::new();

    for course_id in course_ids {
        if !seen.insert(course_id) {
            continue;
        }
        match store.get_course(course_id).await {
            Ok(Some(course)) => {
                courses.insert(course_id.to_string(), course);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(course_id = %course_id, error = %e, "Failed to look up course");
            }
        }
    }

    courses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DatastoreFixture;

    #[tokio::test]
    async fn test_resolve_courses() {
        let fixture = DatastoreFixture::setup();
        fixture
            .store()
            .put_course(CourseAttributes::new("CS101", "Programming"))
            .unwrap();

        let courses =
            resolve_courses(fixture.store(), ["CS101", "CS101", "MISSING"].into_iter()).await;

        assert_eq!(courses.len(), 1);
        assert_eq!(courses["CS101"].name, "Programming");
    }

    #[tokio::test]
    async fn test_resolve_courses_without_session() {
        let fixture = DatastoreFixture::setup();
        fixture
            .store()
            .put_course(CourseAttributes::new("CS101", "Programming"))
            .unwrap();
        let store = fixture.tear_down();

        let courses = resolve_courses(&*store, ["CS101"].into_iter()).await;

        assert!(courses.is_empty());
    }
}
