//! HTTP client for the authoritative properties service.
//!
//! Fetches a property by id and normalizes the response, tolerating the
//! schema variation the upstream is known to exhibit: `{data: ...}`
//! envelope or bare object, `location` vs `city`/`country`, `price` vs
//! `pricePerNight`, `capacity` vs `maxGuests`, and numeric or string
//! owner ids.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use property_search_shared::Property;

/// Client timeout for upstream calls. One attempt per event, no retries.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Key for the owner-id surrogate hash. Changing it would re-map every
/// string owner id, so it is fixed for the lifetime of the index.
const OWNER_SURROGATE_KEY: &[u8] = b"property-search/owner-id";

/// Errors from fetching a property upstream.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be performed.
    #[error("Request error: {0}")]
    RequestError(String),

    /// The upstream answered with a non-200 status.
    #[error("Upstream returned status {status}: {body}")]
    StatusError { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The decoded property violates upstream invariants.
    #[error("Invalid upstream payload: {0}")]
    InvalidPayload(String),
}

/// Abstracts the upstream property lookup for testability.
#[async_trait]
pub trait PropertyFetcher: Send + Sync {
    /// Fetch the authoritative property with the given id.
    async fn fetch(&self, property_id: &str) -> Result<Property, FetchError>;
}

/// HTTP implementation of [`PropertyFetcher`].
pub struct PropertyClient {
    base_url: String,
    client: reqwest::Client,
}

impl PropertyClient {
    /// Create a client for the properties service at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl PropertyFetcher for PropertyClient {
    async fn fetch(&self, property_id: &str) -> Result<Property, FetchError> {
        if property_id.is_empty() {
            return Err(FetchError::InvalidPayload(
                "property id cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/properties/{}", self.base_url, property_id);
        debug!(id = %property_id, url = %url, "fetching property from upstream");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::StatusError {
                status: status.as_u16(),
                body: body.chars().take(256).collect(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        decode_property(&body, Utc::now())
    }
}

/// Upstream payload in whichever of the known shapes it arrives.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperty {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
    /// Single "City, Country" field used by one upstream schema version.
    #[serde(default)]
    location: String,
    #[serde(default, alias = "price")]
    price_per_night: f64,
    #[serde(default)]
    bedrooms: u32,
    #[serde(default)]
    bathrooms: u32,
    #[serde(default, alias = "capacity")]
    max_guests: u32,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default, alias = "ownerID")]
    owner_id: RawOwnerId,
    #[serde(default)]
    available: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Owner id as the upstream sends it: numeric, or a string needing a
/// surrogate.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOwnerId {
    Number(u64),
    Text(String),
}

impl Default for RawOwnerId {
    fn default() -> Self {
        Self::Number(0)
    }
}

/// Decode an upstream response body into the canonical property.
///
/// Accepts either a `{data: Property}` envelope or a bare property
/// object. `ingested_at` fills a missing `createdAt`.
fn decode_property(body: &[u8], ingested_at: DateTime<Utc>) -> Result<Property, FetchError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| FetchError::DecodeError(e.to_string()))?;

    // Unwrap the envelope when present.
    let payload = match value.get("data") {
        Some(data) if data.is_object() => data.clone(),
        _ => value,
    };

    let raw: RawProperty =
        serde_json::from_value(payload).map_err(|e| FetchError::DecodeError(e.to_string()))?;

    normalize(raw, ingested_at)
}

/// Turn a raw upstream record into the canonical property form.
fn normalize(raw: RawProperty, ingested_at: DateTime<Utc>) -> Result<Property, FetchError> {
    if raw.id.is_empty() {
        return Err(FetchError::InvalidPayload(
            "upstream property has no id".to_string(),
        ));
    }

    let (city, country) = if raw.city.is_empty() && raw.country.is_empty() {
        split_location(&raw.location)
    } else {
        (raw.city, raw.country)
    };

    let owner_id = match raw.owner_id {
        RawOwnerId::Number(n) => n,
        RawOwnerId::Text(s) => owner_surrogate(&s),
    };

    Ok(Property {
        id: raw.id,
        title: raw.title,
        description: raw.description,
        city,
        country,
        price_per_night: raw.price_per_night,
        bedrooms: raw.bedrooms,
        bathrooms: raw.bathrooms,
        max_guests: raw.max_guests,
        images: raw.images,
        owner_id,
        available: raw.available,
        created_at: raw.created_at.unwrap_or(ingested_at),
    })
}

/// Split a `"City, Country"` location on the first comma. A location
/// without a comma becomes the city.
fn split_location(location: &str) -> (String, String) {
    match location.split_once(',') {
        Some((city, country)) => (city.trim().to_string(), country.trim().to_string()),
        None => (location.trim().to_string(), String::new()),
    }
}

/// Stable numeric surrogate for a string owner id: the first 8 bytes of a
/// keyed SHA-256 digest, big-endian.
fn owner_surrogate(owner: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(OWNER_SURROGATE_KEY);
    hasher.update(owner.as_bytes());
    let digest = hasher.finalize();
    u64::from_be_bytes(digest[..8].try_into().expect("digest is 32 bytes"))
}
