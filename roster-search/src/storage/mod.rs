//! Datastore access needed by the search layer.
//!
//! The search layer never writes roster records. It reads courses to fill in
//! course names and resolves search hits back to students and instructors.

mod memory;

pub use memory::{EntityKind, InMemoryRosterStore, Roster, StoreSession};

use async_trait::async_trait;

use crate::errors::StorageError;
use roster_search_shared::{CourseAttributes, InstructorAttributes, StudentAttributes};

/// Read access to the roster datastore.
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Look up a course by id.
    async fn get_course(&self, course_id: &str) -> Result<Option<CourseAttributes>, StorageError>;

    /// Look up a student by registration key.
    async fn get_student_for_registration_key(
        &self,
        key: &str,
    ) -> Result<Option<StudentAttributes>, StorageError>;

    /// Look up an instructor by key.
    async fn get_instructor_by_key(
        &self,
        key: &str,
    ) -> Result<Option<InstructorAttributes>, StorageError>;
}
