//! Search document for students.

use tracing::debug;

use super::{
    ResponseMapping, FIELD_COURSE_ID, FIELD_COURSE_NAME, FIELD_EMAIL, FIELD_NAME, FIELD_SECTION,
    FIELD_TEAM,
};
use crate::errors::StorageError;
use crate::storage::RosterStore;
use roster_search_shared::{
    CourseAttributes, IndexDocument, SearchResponse, StudentAttributes, StudentSearchResultBundle,
};

/// Defines how a student is stored on the search engine.
pub struct StudentSearchDocument<'a> {
    student: &'a StudentAttributes,
}

impl<'a> StudentSearchDocument<'a> {
    pub fn new(student: &'a StudentAttributes) -> Self {
        Self { student }
    }

    /// Flatten the student into a search document keyed by registration key.
    ///
    /// `course` is the student's course if it could be found; the course name
    /// is left empty otherwise.
    pub fn to_document(&self, course: Option<&CourseAttributes>) -> IndexDocument {
        let student = self.student;
        IndexDocument::new(student.key.clone())
            .with_field(FIELD_NAME, student.name.clone())
            .with_field(FIELD_EMAIL, student.email.clone())
            .with_field(FIELD_COURSE_ID, student.course.clone())
            .with_field(
                FIELD_COURSE_NAME,
                course.map(|c| c.name.clone()).unwrap_or_default(),
            )
            .with_field(FIELD_TEAM, student.team.clone())
            .with_field(FIELD_SECTION, student.section.clone())
    }

    /// Produce a result bundle from a search response.
    ///
    /// Hits are resolved to students through the datastore. Hits whose student
    /// no longer exists are skipped and reported in `stale_ids`. Students are
    /// ordered by course, section, team, name and email.
    pub async fn from_response(
        response: Option<SearchResponse>,
        store: &dyn RosterStore,
    ) -> Result<ResponseMapping<StudentSearchResultBundle>, StorageError> {
        let Some(response) = response else {
            return Ok(ResponseMapping::default());
        };

        let mut mapping = ResponseMapping::<StudentSearchResultBundle>::default();
        for hit in response.hits {
            match store.get_student_for_registration_key(&hit.id).await? {
                Some(student) => mapping.bundle.students.push(student),
                None => {
                    debug!(id = %hit.id, "Search hit has no matching student");
                    mapping.stale_ids.push(hit.id);
                }
            }
        }

        sort_student_results(&mut mapping.bundle.students);
        Ok(mapping)
    }
}

fn sort_student_results(students: &mut [StudentAttributes]) {
    students.sort_by(|a, b| {
        a.course
            .cmp(&b.course)
            .then_with(|| a.section.cmp(&b.section))
            .then_with(|| a.team.cmp(&b.team))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.email.cmp(&b.email))
    });
}
