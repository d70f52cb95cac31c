//! # Property Search Shared
//!
//! This crate defines shared data structures used across the property search
//! service. It includes the canonical `Property` domain type, the normalized
//! `SearchRequest` with its cache fingerprint, and the response DTOs.

pub mod types;

pub use types::cached_page::CachedPage;
pub use types::property::Property;
pub use types::search_request::{SearchRequest, SORT_FIELDS};
pub use types::search_response::{ErrorResponse, SearchResponse};
