//! In-process datastore.
//!
//! Entity kinds must be registered and a session must be open before any
//! read or write, mirroring how the hosted datastore client is used.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::errors::StorageError;
use crate::storage::RosterStore;
use roster_search_shared::{CourseAttributes, InstructorAttributes, StudentAttributes};

/// Kinds of entities held by the datastore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Course,
    Student,
    Instructor,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Course, EntityKind::Student, EntityKind::Instructor];

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Course => "Course",
            EntityKind::Student => "Student",
            EntityKind::Instructor => "Instructor",
        }
    }
}

/// A roster as found in a JSON roster file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub courses: Vec<CourseAttributes>,
    #[serde(default)]
    pub students: Vec<StudentAttributes>,
    #[serde(default)]
    pub instructors: Vec<InstructorAttributes>,
}

/// An open datastore session. The session closes when dropped.
#[derive(Debug)]
pub struct StoreSession {
    open_sessions: Arc<AtomicUsize>,
}

impl StoreSession {
    /// Close the session explicitly.
    pub fn close(self) {}
}

impl Drop for StoreSession {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Datastore keeping every entity in memory.
#[derive(Debug)]
pub struct InMemoryRosterStore {
    project_id: String,
    registered: RwLock<HashSet<EntityKind>>,
    open_sessions: Arc<AtomicUsize>,
    courses: RwLock<HashMap<String, CourseAttributes>>,
    students: RwLock<HashMap<String, StudentAttributes>>,
    instructors: RwLock<HashMap<String, InstructorAttributes>>,
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::backend("datastore lock poisoned")
}

impl InMemoryRosterStore {
    /// Create an empty datastore for a project. No entity kind is registered yet.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            registered: RwLock::new(HashSet::new()),
            open_sessions: Arc::new(AtomicUsize::new(0)),
            courses: RwLock::new(HashMap::new()),
            students: RwLock::new(HashMap::new()),
            instructors: RwLock::new(HashMap::new()),
        }
    }

    /// Create a datastore holding every record of a roster.
    pub fn from_roster(project_id: impl Into<String>, roster: Roster) -> Result<Self, StorageError> {
        let store = Self::new(project_id);
        store.register_entity_kinds()?;

        let _session = store.begin();
        for course in roster.courses {
            store.put_course(course)?;
        }
        for student in roster.students {
            store.put_student(student)?;
        }
        for instructor in roster.instructors {
            store.put_instructor(instructor)?;
        }

        Ok(store)
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Register one entity kind.
    pub fn register_kind(&self, kind: EntityKind) -> Result<(), StorageError> {
        self.registered.write().map_err(poisoned)?.insert(kind);
        Ok(())
    }

    /// Register every entity kind the roster uses.
    pub fn register_entity_kinds(&self) -> Result<(), StorageError> {
        for kind in EntityKind::ALL {
            self.register_kind(kind)?;
        }
        debug!(project_id = %self.project_id, "Registered entity kinds");
        Ok(())
    }

    /// Open a session. Sessions may be nested.
    pub fn begin(&self) -> StoreSession {
        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        StoreSession {
            open_sessions: Arc::clone(&self.open_sessions),
        }
    }

    pub fn has_open_session(&self) -> bool {
        self.open_sessions.load(Ordering::SeqCst) > 0
    }

    fn check_access(&self, kind: EntityKind) -> Result<(), StorageError> {
        if !self.has_open_session() {
            return Err(StorageError::NoActiveSession);
        }
        if !self.registered.read().map_err(poisoned)?.contains(&kind) {
            return Err(StorageError::UnregisteredKind(kind.name().to_string()));
        }
        Ok(())
    }

    pub fn put_course(&self, course: CourseAttributes) -> Result<(), StorageError> {
        self.check_access(EntityKind::Course)?;
        self.courses
            .write()
            .map_err(poisoned)?
            .insert(course.id.clone(), course);
        Ok(())
    }

    pub fn put_student(&self, student: StudentAttributes) -> Result<(), StorageError> {
        self.check_access(EntityKind::Student)?;
        self.students
            .write()
            .map_err(poisoned)?
            .insert(student.key.clone(), student);
        Ok(())
    }

    pub fn put_instructor(&self, instructor: InstructorAttributes) -> Result<(), StorageError> {
        self.check_access(EntityKind::Instructor)?;
        self.instructors
            .write()
            .map_err(poisoned)?
            .insert(instructor.key.clone(), instructor);
        Ok(())
    }

    /// Remove a student, returning it if it existed.
    pub fn delete_student(&self, key: &str) -> Result<Option<StudentAttributes>, StorageError> {
        self.check_access(EntityKind::Student)?;
        Ok(self.students.write().map_err(poisoned)?.remove(key))
    }

    /// Remove an instructor, returning it if it existed.
    pub fn delete_instructor(
        &self,
        key: &str,
    ) -> Result<Option<InstructorAttributes>, StorageError> {
        self.check_access(EntityKind::Instructor)?;
        Ok(self.instructors.write().map_err(poisoned)?.remove(key))
    }

    /// Every student, in no particular order.
    pub fn all_students(&self) -> Result<Vec<StudentAttributes>, StorageError> {
        self.check_access(EntityKind::Student)?;
        Ok(self.students.read().map_err(poisoned)?.values().cloned().collect())
    }

    /// Every instructor, in no particular order.
    pub fn all_instructors(&self) -> Result<Vec<InstructorAttributes>, StorageError> {
        self.check_access(EntityKind::Instructor)?;
        Ok(self
            .instructors
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RosterStore for InMemoryRosterStore {
    async fn get_course(&self, course_id: &str) -> Result<Option<CourseAttributes>, StorageError> {
        self.check_access(EntityKind::Course)?;
        Ok(self.courses.read().map_err(poisoned)?.get(course_id).cloned())
    }

    async fn get_student_for_registration_key(
        &self,
        key: &str,
    ) -> Result<Option<StudentAttributes>, StorageError> {
        self.check_access(EntityKind::Student)?;
        Ok(self.students.read().map_err(poisoned)?.get(key).cloned())
    }

    async fn get_instructor_by_key(
        &self,
        key: &str,
    ) -> Result<Option<InstructorAttributes>, StorageError> {
        self.check_access(EntityKind::Instructor)?;
        Ok(self.instructors.read().map_err(poisoned)?.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_access_requires_session() {
        let store = InMemoryRosterStore::new("test-project");
        store.register_entity_kinds().unwrap();

        let result = store.get_course("CS101").await;
        assert!(matches!(result, Err(StorageError::NoActiveSession)));

        let session = store.begin();
        assert!(store.get_course("CS101").await.unwrap().is_none());

        session.close();
        assert!(!store.has_open_session());
    }

    #[tokio::test]
    async fn test_access_requires_registered_kind() {
        let store = InMemoryRosterStore::new("test-project");
        store.register_kind(EntityKind::Course).unwrap();
        let _session = store.begin();

        store.put_course(CourseAttributes::new("CS101", "Programming")).unwrap();

        let result = store.put_student(StudentAttributes::new("a@example.com", "CS101", "Alice"));
        assert!(matches!(result, Err(StorageError::UnregisteredKind(kind)) if kind == "Student"));
    }

    #[test]
    fn test_nested_sessions() {
        let store = InMemoryRosterStore::new("test-project");

        let outer = store.begin();
        let inner = store.begin();
        drop(inner);
        assert!(store.has_open_session());

        drop(outer);
        assert!(!store.has_open_session());
    }

    #[tokio::test]
    async fn test_from_roster() {
        let roster: Roster = serde_json::from_str(
            r#"{
                "courses": [ { "id": "CS101", "name": "Programming" } ],
                "students": [
                    { "key": "s1", "email": "alice@example.com", "course": "CS101", "name": "Alice" }
                ],
                "instructors": [
                    { "key": "i1", "course_id": "CS101", "name": "Carol", "email": "carol@example.com" }
                ]
            }"#,
        )
        .unwrap();

        let store = InMemoryRosterStore::from_roster("test-project", roster).unwrap();
        assert!(!store.has_open_session());

        let _session = store.begin();
        let course = store.get_course("CS101").await.unwrap().unwrap();
        assert_eq!(course.name, "Programming");

        let student = store.get_student_for_registration_key("s1").await.unwrap().unwrap();
        assert_eq!(student.name, "Alice");

        let instructor = store.get_instructor_by_key("i1").await.unwrap().unwrap();
        assert_eq!(instructor.email, "carol@example.com");
        assert_eq!(store.all_students().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_student() {
        let store = InMemoryRosterStore::new("test-project");
        store.register_entity_kinds().unwrap();
        let _session = store.begin();

        let student = StudentAttributes::new("a@example.com", "CS101", "Alice").with_key("s1");
        store.put_student(student).unwrap();

        assert!(store.delete_student("s1").unwrap().is_some());
        assert!(store.delete_student("s1").unwrap().is_none());
        assert!(store
            .get_student_for_registration_key("s1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_instructor() {
        let store = InMemoryRosterStore::new("test-project");
        store.register_entity_kinds().unwrap();
        let session = store.begin();

        let carol = InstructorAttributes::new("CS101", "Carol", "carol@example.com").with_key("i1");
        store.put_instructor(carol.clone()).unwrap();

        assert_eq!(store.delete_instructor("i1").unwrap(), Some(carol));
        assert!(store.delete_instructor("i1").unwrap().is_none());
        assert!(store.all_instructors().unwrap().is_empty());

        session.close();
        assert!(matches!(
            store.delete_instructor("i1"),
            Err(StorageError::NoActiveSession)
        ));
    }
}
