//! HTTP request handlers.
//!
//! `/search` parses and validates query parameters into a search request;
//! every error response is `{error, code}` JSON with the status mirrored
//! in `code`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use property_search_shared::{ErrorResponse, SearchRequest};

use crate::service::SearchService;

/// End-to-end deadline for a search request.
const REQUEST_DEADLINE: Duration = Duration::from_secs(30);

/// Raw `/search` query parameters.
///
/// Everything arrives as optional text; numeric fields are parsed
/// explicitly so a bad value produces a 400 naming the parameter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    query: Option<String>,
    city: Option<String>,
    country: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
    bedrooms: Option<String>,
    bathrooms: Option<String>,
    min_guests: Option<String>,
    page: Option<String>,
    page_size: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

impl SearchParams {
    /// Parse the raw parameters into a search request, leaving omitted
    /// fields at their defaults.
    pub fn into_request(self) -> Result<SearchRequest, String> {
        let mut request = SearchRequest::default();

        if let Some(query) = self.query {
            request.query = query;
        }
        if let Some(city) = self.city {
            request.city = city;
        }
        if let Some(country) = self.country {
            request.country = country;
        }
        if let Some(raw) = self.min_price {
            request.min_price = parse_f64("minPrice", &raw)?;
        }
        if let Some(raw) = self.max_price {
            request.max_price = parse_f64("maxPrice", &raw)?;
        }
        if let Some(raw) = self.bedrooms {
            request.bedrooms = parse_u32("bedrooms", &raw)?;
        }
        if let Some(raw) = self.bathrooms {
            request.bathrooms = parse_u32("bathrooms", &raw)?;
        }
        if let Some(raw) = self.min_guests {
            request.min_guests = parse_u32("minGuests", &raw)?;
        }
        if let Some(raw) = self.page {
            request.page = parse_u32("page", &raw)?;
        }
        if let Some(raw) = self.page_size {
            request.page_size = parse_u32("pageSize", &raw)?;
        }
        if let Some(sort_by) = self.sort_by {
            request.sort_by = sort_by;
        }
        if let Some(sort_order) = self.sort_order {
            request.sort_order = sort_order;
        }

        Ok(request)
    }
}

fn parse_f64(name: &str, raw: &str) -> Result<f64, String> {
    raw.parse()
        .map_err(|_| format!("{name} must be a valid number"))
}

fn parse_u32(name: &str, raw: &str) -> Result<u32, String> {
    raw.parse()
        .map_err(|_| format!("{name} must be a valid non-negative integer"))
}

/// `GET /search`
pub async fn search(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let request = match params.into_request() {
        Ok(request) => request,
        Err(message) => {
            warn!(error = %message, "rejecting malformed search parameters");
            return error_response(StatusCode::BAD_REQUEST, message);
        }
    };

    match tokio::time::timeout(REQUEST_DEADLINE, service.search(request)).await {
        Ok(Ok(response)) => {
            info!(total = response.total_results, "search completed");
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(Err(e)) => {
            let status = StatusCode::from_u16(e.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            warn!(error = %e, status = %status, "search failed");
            error_response(status, e.to_string())
        }
        Err(_) => {
            warn!(deadline_secs = REQUEST_DEADLINE.as_secs(), "search timed out");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "search timed out")
        }
    }
}

/// `GET /health`
pub async fn health() -> Response {
    (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
}

/// Preflight requests short-circuit with 204; the CORS layer attaches the
/// headers.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Fallback for unsupported methods on known routes.
pub async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse::new(message, status.as_u16())),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_request_defaults() {
        let request = SearchParams::default().into_request().unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 10);
        assert_eq!(request.sort_order, "asc");
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_into_request_parses_numbers() {
        let params = SearchParams {
            min_price: Some("50".to_string()),
            max_price: Some("150.5".to_string()),
            bedrooms: Some("2".to_string()),
            page: Some("3".to_string()),
            ..Default::default()
        };
        let request = params.into_request().unwrap();
        assert_eq!(request.min_price, 50.0);
        assert_eq!(request.max_price, 150.5);
        assert_eq!(request.bedrooms, 2);
        assert_eq!(request.page, 3);
    }

    #[test]
    fn test_into_request_rejects_bad_number() {
        let params = SearchParams {
            min_price: Some("cheap".to_string()),
            ..Default::default()
        };
        let error = params.into_request().unwrap_err();
        assert!(error.contains("minPrice"));
    }

    #[test]
    fn test_into_request_rejects_negative_integer() {
        let params = SearchParams {
            bedrooms: Some("-1".to_string()),
            ..Default::default()
        };
        let error = params.into_request().unwrap_err();
        assert!(error.contains("bedrooms"));
    }

    #[test]
    fn test_into_request_passes_sort_through() {
        let params = SearchParams {
            sort_by: Some("price".to_string()),
            sort_order: Some("desc".to_string()),
            ..Default::default()
        };
        let request = params.into_request().unwrap();
        assert_eq!(request.sort_by, "price");
        assert_eq!(request.sort_order, "desc");
    }
}
