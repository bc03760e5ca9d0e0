//! Domain records read by the search layer.
//!
//! These records are owned by the rest of the application. The search layer
//! only copies their fields into search documents and hands them back as
//! search results.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A course offered in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAttributes {
    /// Unique course identifier (e.g. `CS101-2024`).
    pub id: String,
    /// Human readable course name.
    pub name: String,
    /// IANA time zone of the course.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

impl CourseAttributes {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            time_zone: default_time_zone(),
        }
    }
}

/// A student enrolled in a course.
///
/// The registration `key` doubles as the id of the student's search document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAttributes {
    /// Registration key.
    pub key: String,
    /// Account id once the student has joined, empty before that.
    #[serde(default)]
    pub google_id: String,
    pub email: String,
    /// Id of the course the student is enrolled in.
    pub course: String,
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub comments: String,
}

impl StudentAttributes {
    /// Create a student with a freshly generated registration key.
    pub fn new(
        email: impl Into<String>,
        course: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            key: Uuid::new_v4().to_string(),
            google_id: String::new(),
            email: email.into(),
            course: course.into(),
            name: name.into(),
            team: String::new(),
            section: String::new(),
            comments: String::new(),
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = team.into();
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

/// An instructor of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorAttributes {
    /// Instructor key, also the id of the instructor's search document.
    pub key: String,
    /// Account id, absent until the instructor has joined the course.
    #[serde(default)]
    pub google_id: Option<String>,
    pub course_id: String,
    pub name: String,
    pub email: String,
    /// Access role, e.g. `Co-owner`, `Manager`, `Tutor`.
    #[serde(default)]
    pub role: String,
    /// Name shown to students.
    #[serde(default)]
    pub displayed_name: String,
}

impl InstructorAttributes {
    /// Create an instructor with a freshly generated key.
    pub fn new(
        course_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            key: Uuid::new_v4().to_string(),
            google_id: None,
            course_id: course_id.into(),
            name: name.into(),
            email: email.into(),
            role: String::new(),
            displayed_name: "Instructor".to_string(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_google_id(mut self, google_id: impl Into<String>) -> Self {
        self.google_id = Some(google_id.into());
        self
    }

    pub fn with_displayed_name(mut self, displayed_name: impl Into<String>) -> Self {
        self.displayed_name = displayed_name.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_student_gets_unique_key() {
        let first = StudentAttributes::new("a@example.com", "CS101", "Alice");
        let second = StudentAttributes::new("a@example.com", "CS101", "Alice");

        assert!(!first.key.is_empty());
        assert_ne!(first.key, second.key);
        assert!(first.team.is_empty());
    }

    #[test]
    fn test_student_deserializes_with_defaults() {
        let json = r#"{
            "key": "k-1",
            "email": "bob@example.com",
            "course": "CS101",
            "name": "Bob"
        }"#;

        let student: StudentAttributes = serde_json::from_str(json).unwrap();

        assert_eq!(student.key, "k-1");
        assert_eq!(student.section, "");
        assert_eq!(student.google_id, "");
    }

    #[test]
    fn test_instructor_builder() {
        let instructor = InstructorAttributes::new("CS101", "Carol", "carol@example.com")
            .with_role("Co-owner")
            .with_google_id("carol.g");

        assert_eq!(instructor.role, "Co-owner");
        assert_eq!(instructor.google_id.as_deref(), Some("carol.g"));
        assert_eq!(instructor.displayed_name, "Instructor");
    }

    #[test]
    fn test_course_default_time_zone() {
        let course: CourseAttributes =
            serde_json::from_str(r#"{ "id": "CS101", "name": "Programming" }"#).unwrap();
        assert_eq!(course.time_zone, "UTC");
    }
}
