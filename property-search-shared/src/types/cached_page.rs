//! Cached result page type.

use serde::{Deserialize, Serialize};

use crate::types::property::Property;

/// One cached page of search results, keyed by the request fingerprint.
///
/// The page/pageSize metadata is not stored; it is reattached from the
/// request when a cached page is served.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CachedPage {
    /// The properties of this page.
    pub properties: Vec<Property>,

    /// Total matching count at the time the page was cached.
    pub total_results: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_json() {
        let page = CachedPage {
            properties: Vec::new(),
            total_results: 42,
        };
        let bytes = serde_json::to_vec(&page).unwrap();
        let decoded: CachedPage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(page, decoded);
    }
}
