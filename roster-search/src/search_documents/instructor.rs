//! Search document for instructors.

use tracing::debug;

use super::{
    ResponseMapping, FIELD_COURSE_ID, FIELD_COURSE_NAME, FIELD_DISPLAYED_NAME, FIELD_EMAIL,
    FIELD_GOOGLE_ID, FIELD_NAME, FIELD_ROLE,
};
use crate::errors::StorageError;
use crate::storage::RosterStore;
use roster_search_shared::{
    CourseAttributes, IndexDocument, InstructorAttributes, InstructorSearchResultBundle,
    SearchResponse,
};

/// Defines how an instructor is stored on the search engine.
pub struct InstructorSearchDocument<'a> {
    instructor: &'a InstructorAttributes,
}

impl<'a> InstructorSearchDocument<'a> {
    pub fn new(instructor: &'a InstructorAttributes) -> Self {
        Self { instructor }
    }

    /// Flatten the instructor into a search document keyed by instructor key.
    pub fn to_document(&self, course: Option<&CourseAttributes>) -> IndexDocument {
        let instructor = self.instructor;
        IndexDocument::new(instructor.key.clone())
            .with_field(FIELD_NAME, instructor.name.clone())
            .with_field(FIELD_EMAIL, instructor.email.clone())
            .with_field(FIELD_COURSE_ID, instructor.course_id.clone())
            .with_field(
                FIELD_COURSE_NAME,
                course.map(|c| c.name.clone()).unwrap_or_default(),
            )
            .with_field(
                FIELD_GOOGLE_ID,
                instructor.google_id.clone().unwrap_or_default(),
            )
            .with_field(FIELD_ROLE, instructor.role.clone())
            .with_field(FIELD_DISPLAYED_NAME, instructor.displayed_name.clone())
    }

    /// Produce a result bundle from a search response.
    ///
    /// Instructors are ordered by course id, role, name and email.
    pub async fn from_response(
        response: Option<SearchResponse>,
        store: &dyn RosterStore,
    ) -> Result<ResponseMapping<InstructorSearchResultBundle>, StorageError> {
        let Some(response) = response else {
            return Ok(ResponseMapping::default());
        };

        let mut mapping = ResponseMapping::<InstructorSearchResultBundle>::default();
        for hit in response.hits {
            match store.get_instructor_by_key(&hit.id).await? {
                Some(instructor) => mapping.bundle.instructors.push(instructor),
                None => {
                    debug!(id = %hit.id, "Search hit has no matching instructor");
                    mapping.stale_ids.push(hit.id);
                }
            }
        }

        sort_instructor_results(&mut mapping.bundle.instructors);
        Ok(mapping)
    }
}

fn sort_instructor_results(instructors: &mut [InstructorAttributes]) {
    instructors.sort_by(|a, b| {
        a.course_id
            .cmp(&b.course_id)
            .then_with(|| a.role.cmp(&b.role))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.email.cmp(&b.email))
    });
}
