//! Search request type.
//!
//! This module defines the normalized query structure used on the read
//! path, its validation rules, and the cache-key fingerprint derived
//! from it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Default page when the caller supplies none.
const DEFAULT_PAGE: u32 = 1;

/// Default page size when the caller supplies none.
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest permitted page size.
const MAX_PAGE_SIZE: u32 = 100;

/// Engine fields a request may sort by. Anything else is rejected before
/// a query is built.
pub const SORT_FIELDS: &[&str] = &["price", "created_at", "bedrooms"];

/// Search query parameters.
///
/// Numeric filters of zero mean "unset", not "equal to zero". An empty
/// `sort_by` means engine-default ordering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    /// Free-text search term, matched against title, city, and country.
    pub query: String,

    /// Exact city filter.
    pub city: String,

    /// Exact country filter.
    pub country: String,

    /// Lower bound of the nightly price range.
    pub min_price: f64,

    /// Upper bound of the nightly price range. Zero means open-ended.
    pub max_price: f64,

    /// Exact bedroom count filter.
    pub bedrooms: u32,

    /// Exact bathroom count filter.
    pub bathrooms: u32,

    /// Minimum guest capacity filter.
    pub min_guests: u32,

    /// Page number, 1-based.
    pub page: u32,

    /// Results per page, in `[1, 100]`.
    pub page_size: u32,

    /// Optional sort field; must be one of [`SORT_FIELDS`] when set.
    pub sort_by: String,

    /// Sort direction, `asc` or `desc`.
    pub sort_order: String,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            city: String::new(),
            country: String::new(),
            min_price: 0.0,
            max_price: 0.0,
            bedrooms: 0,
            bathrooms: 0,
            min_guests: 0,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: String::new(),
            sort_order: "asc".to_string(),
        }
    }
}

impl SearchRequest {
    /// Apply defaults so that two requests that only differ in omitted
    /// fields compare equal.
    ///
    /// `page < 1` is coerced to 1, `page_size < 1` falls back to the
    /// default, and `sort_order` is lowercased with `asc` as the default.
    pub fn normalized(mut self) -> Self {
        if self.page < 1 {
            self.page = DEFAULT_PAGE;
        }
        if self.page_size < 1 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        self.sort_order = self.sort_order.to_lowercase();
        if self.sort_order.is_empty() {
            self.sort_order = "asc".to_string();
        }
        self
    }

    /// Validate the request parameters.
    ///
    /// Expects a normalized request. Returns an error message describing
    /// the first violated rule.
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size > MAX_PAGE_SIZE {
            return Err(format!("pageSize cannot exceed {}", MAX_PAGE_SIZE));
        }
        if self.min_price < 0.0 {
            return Err("minPrice cannot be negative".to_string());
        }
        if self.max_price < 0.0 {
            return Err("maxPrice cannot be negative".to_string());
        }
        if self.min_price > 0.0 && self.max_price > 0.0 && self.min_price > self.max_price {
            return Err("minPrice cannot be greater than maxPrice".to_string());
        }
        if self.sort_order != "asc" && self.sort_order != "desc" {
            return Err("sortOrder must be 'asc' or 'desc'".to_string());
        }
        if !self.sort_by.is_empty() && !SORT_FIELDS.contains(&self.sort_by.as_str()) {
            return Err(format!(
                "sortBy must be one of: {}",
                SORT_FIELDS.join(", ")
            ));
        }
        Ok(())
    }

    /// Deterministic cache key for this request.
    ///
    /// All normalized fields are concatenated in a fixed order and hashed,
    /// so requests that only differ in HTTP parameter order produce the
    /// same key. The key is `search:` followed by the hex encoding of the
    /// first 16 bytes of the SHA-256 digest.
    pub fn fingerprint(&self) -> String {
        let canonical = format!(
            "query:{}|city:{}|country:{}|minPrice:{:.2}|maxPrice:{:.2}|bedrooms:{}|bathrooms:{}|minGuests:{}|page:{}|pageSize:{}|sortBy:{}|sortOrder:{}",
            self.query,
            self.city,
            self.country,
            self.min_price,
            self.max_price,
            self.bedrooms,
            self.bathrooms,
            self.min_guests,
            self.page,
            self.page_size,
            self.sort_by,
            self.sort_order,
        );
        let digest = Sha256::digest(canonical.as_bytes());
        format!("search:{}", hex::encode(&digest[..16]))
    }
}
