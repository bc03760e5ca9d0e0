//! # Roster Search Shared
//!
//! Records, result bundles and engine-neutral search document types shared
//! between the search repository and the search manager.

pub mod bundles;
pub mod documents;
pub mod records;

pub use bundles::{InstructorSearchResultBundle, StudentSearchResultBundle};
pub use documents::{
    Collection, FieldFilter, IndexDocument, SearchHit, SearchQuery, SearchResponse,
};
pub use records::{CourseAttributes, InstructorAttributes, StudentAttributes};
