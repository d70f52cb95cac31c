//! The canonical property type.
//!
//! This is the unit that flows through the write path (upstream fetch →
//! index) and back out of the read path (index → search response).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rental property as indexed and returned by the search service.
///
/// Wire names are camelCase to match the platform's HTTP contracts.
/// Integer attributes absent upstream default to zero; a zero numeric
/// filter on the read side means "unset", never "equal to zero".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Opaque unique identifier. Must be non-empty at every lifecycle stage.
    pub id: String,

    /// Listing title (primary search field). Must be non-empty before indexing.
    pub title: String,

    /// Free-text description.
    #[serde(default)]
    pub description: String,

    /// City the property is located in.
    #[serde(default)]
    pub city: String,

    /// Country the property is located in.
    #[serde(default)]
    pub country: String,

    /// Price per night. Never negative.
    #[serde(default)]
    pub price_per_night: f64,

    /// Number of bedrooms.
    #[serde(default)]
    pub bedrooms: u32,

    /// Number of bathrooms.
    #[serde(default)]
    pub bathrooms: u32,

    /// Maximum guest capacity.
    #[serde(default)]
    pub max_guests: u32,

    /// Ordered list of image URLs. May be empty.
    #[serde(default)]
    pub images: Vec<String>,

    /// Numeric owner identifier. String owner ids from upstream are mapped
    /// to a stable numeric surrogate before this type is constructed.
    #[serde(default)]
    pub owner_id: u64,

    /// Whether the property is available for booking.
    #[serde(default)]
    pub available: bool,

    /// Record creation time. Filled with the ingest time when upstream
    /// omits it.
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl Property {
    /// Validate the invariants a property must hold before it may touch
    /// the index.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("property id cannot be empty".to_string());
        }
        if self.title.is_empty() {
            return Err("property title cannot be empty".to_string());
        }
        if self.price_per_night < 0.0 {
            return Err("pricePerNight cannot be negative".to_string());
        }
        Ok(())
    }
}
