//! Search response types.
//!
//! This module defines the paginated response returned from search
//! operations and the error body shared by all HTTP error responses.

use serde::{Deserialize, Serialize};

use crate::types::property::Property;

/// Paginated search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// The matching properties for the requested page.
    pub results: Vec<Property>,

    /// Total number of matching documents across all pages.
    pub total_results: usize,

    /// The page these results belong to, 1-based.
    pub page: u32,

    /// Page size used for this response.
    pub page_size: u32,

    /// Total number of pages available.
    pub total_pages: u32,
}

impl SearchResponse {
    /// Build a response, deriving `total_pages` from the total count and
    /// page size.
    ///
    /// `total_pages` is the ceiling of `total_results / page_size`, forced
    /// to at least 1 whenever there are results.
    pub fn new(results: Vec<Property>, total_results: usize, page: u32, page_size: u32) -> Self {
        let mut total_pages = if page_size > 0 {
            (total_results as u64).div_ceil(page_size as u64) as u32
        } else {
            0
        };
        if total_pages == 0 && total_results > 0 {
            total_pages = 1;
        }
        Self {
            results,
            total_results,
            page,
            page_size,
            total_pages,
        }
    }
}

/// Error body returned by every failing HTTP response.
///
/// `code` always matches the HTTP status of the response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Human-readable error description.
    pub error: String,

    /// HTTP status code.
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}
