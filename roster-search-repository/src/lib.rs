//! # Roster Search Repository
//!
//! This crate provides the interface for talking to the external search
//! engine that backs roster search. It includes the error type, the
//! `SearchEngineClient` trait, and a concrete implementation for OpenSearch.

pub mod errors;
pub mod interfaces;
pub mod opensearch;

pub use errors::SearchError;
pub use interfaces::SearchEngineClient;
pub use opensearch::OpenSearchClient;
