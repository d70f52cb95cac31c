//! Solr document codec.
//!
//! Encoding maps the domain property onto the engine schema; decoding
//! tolerates Solr's habit of returning any stored field as either a
//! scalar or a single-element list.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use property_search_shared::Property;

/// A property in engine-schema form.
///
/// Field names here are the index schema; `price` is the single price
/// field used on both the write and read paths.
#[derive(Debug, Serialize)]
pub(crate) struct SolrDocument {
    pub id: String,
    pub title: String,
    pub description: String,
    pub city: String,
    pub country: String,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub max_guests: u32,
    pub images: Vec<String>,
    pub owner_id: u64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl SolrDocument {
    /// Map a property onto the engine schema.
    ///
    /// A zero `created_at` is replaced with the current time so the index
    /// never stores the epoch placeholder. Suspicious fields are logged so
    /// operators can spot upstream schema drift.
    pub(crate) fn from_property(property: &Property) -> Self {
        let created_at = if property.created_at.timestamp() == 0 {
            Utc::now()
        } else {
            property.created_at
        };

        if property.id.is_empty() {
            warn!("encoding property with empty id");
        }
        if property.title.is_empty() {
            warn!(id = %property.id, "encoding property with empty title");
        }
        if property.price_per_night == 0.0 {
            warn!(id = %property.id, "encoding property with zero price");
        }
        if property.city.is_empty() && property.country.is_empty() {
            warn!(id = %property.id, "encoding property without city or country");
        }

        Self {
            id: property.id.clone(),
            title: property.title.clone(),
            description: property.description.clone(),
            city: property.city.clone(),
            country: property.country.clone(),
            price: property.price_per_night,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            max_guests: property.max_guests,
            images: property.images.clone(),
            owner_id: property.owner_id,
            available: property.available,
            created_at,
        }
    }
}

/// The first element of a list-valued field, or the value itself when Solr
/// returns a scalar.
fn first_value<'a>(doc: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match doc.get(key) {
        Some(Value::Array(items)) => items.first(),
        other => other,
    }
}

fn read_string(doc: &Map<String, Value>, key: &str) -> String {
    first_value(doc, key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn read_f64(doc: &Map<String, Value>, key: &str) -> f64 {
    first_value(doc, key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn read_u32(doc: &Map<String, Value>, key: &str) -> u32 {
    first_value(doc, key)
        .and_then(Value::as_u64)
        .unwrap_or(0)
        .min(u32::MAX as u64) as u32
}

fn read_u64(doc: &Map<String, Value>, key: &str) -> u64 {
    first_value(doc, key).and_then(Value::as_u64).unwrap_or(0)
}

fn read_bool(doc: &Map<String, Value>, key: &str) -> bool {
    first_value(doc, key)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Images keep the whole list, not just the first element.
fn read_images(doc: &Map<String, Value>) -> Vec<String> {
    match doc.get("images") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(single)) => vec![single.clone()],
        _ => Vec::new(),
    }
}

/// An unparseable timestamp leaves `created_at` at the zero value.
fn read_created_at(doc: &Map<String, Value>) -> DateTime<Utc> {
    let raw = read_string(doc, "created_at");
    if raw.is_empty() {
        return DateTime::<Utc>::UNIX_EPOCH;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%SZ") {
        return parsed.and_utc();
    }
    warn!(created_at = %raw, "unparseable created_at in index document");
    DateTime::<Utc>::UNIX_EPOCH
}

/// Decode an engine document into a property.
///
/// Unknown or missing fields yield their zero value. Documents without an
/// id are dropped (logged), but never fail the whole response.
pub(crate) fn decode_document(doc: &Map<String, Value>) -> Option<Property> {
    let id = read_string(doc, "id");
    if id.is_empty() {
        warn!("skipping index document without id");
        return None;
    }

    Some(Property {
        id,
        title: read_string(doc, "title"),
        description: read_string(doc, "description"),
        city: read_string(doc, "city"),
        country: read_string(doc, "country"),
        price_per_night: read_f64(doc, "price"),
        bedrooms: read_u32(doc, "bedrooms"),
        bathrooms: read_u32(doc, "bathrooms"),
        max_guests: read_u32(doc, "max_guests"),
        images: read_images(doc),
        owner_id: read_u64(doc, "owner_id"),
        available: read_bool(doc, "available"),
        created_at: read_created_at(doc),
    })
}
