//! Upstream properties-api client.

mod properties;

pub use properties::{FetchError, PropertyClient, PropertyFetcher};
