//! Result bundles returned by student and instructor searches.

use serde::Serialize;

use crate::records::{InstructorAttributes, StudentAttributes};

/// Students matching a search, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentSearchResultBundle {
    pub students: Vec<StudentAttributes>,
}

impl StudentSearchResultBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

/// Instructors matching a search, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstructorSearchResultBundle {
    pub instructors: Vec<InstructorAttributes>,
}

impl InstructorSearchResultBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructors.is_empty()
    }
}
